mod application;
mod common;
mod scheduling;
mod screening;
