use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use super::domain::InterviewSlot;
use super::roles::{load_document, write_document};

#[derive(Debug, thiserror::Error)]
pub enum SlotPoolError {
    #[error("slot '{0}' is not in the offerable pool")]
    NotOffered(InterviewSlot),
    #[error("no interview slots are currently offered")]
    Exhausted,
    #[error("slot pool unavailable: {0}")]
    Unavailable(String),
}

/// Recruiter-curated pool of offerable interview timestamps.
///
/// Booking consumes the slot: it is removed from the offerable pool so the
/// same time cannot be handed to the next candidate (see DESIGN.md for the
/// double-booking trade-offs).
pub trait SlotPool: Send + Sync {
    fn available(&self) -> Result<Vec<InterviewSlot>, SlotPoolError>;

    /// The recruiter-proposed slot offered first: the head of the pool.
    fn proposed(&self) -> Result<Option<InterviewSlot>, SlotPoolError> {
        Ok(self.available()?.into_iter().next())
    }

    fn contains(&self, slot: InterviewSlot) -> Result<bool, SlotPoolError> {
        Ok(self.available()?.contains(&slot))
    }

    fn book(&self, slot: InterviewSlot) -> Result<(), SlotPoolError>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SlotPoolDoc {
    available_times: Vec<InterviewSlot>,
}

/// File-backed pool over the `available_times` JSON document. Missing or
/// corrupt documents load as an empty pool.
pub struct JsonSlotPool {
    path: PathBuf,
    times: Mutex<Vec<InterviewSlot>>,
}

impl JsonSlotPool {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let doc: SlotPoolDoc = load_document(&path);
        Self {
            path,
            times: Mutex::new(doc.available_times),
        }
    }
}

impl SlotPool for JsonSlotPool {
    fn available(&self) -> Result<Vec<InterviewSlot>, SlotPoolError> {
        let times = self.times.lock().expect("slot pool mutex poisoned");
        Ok(times.clone())
    }

    fn book(&self, slot: InterviewSlot) -> Result<(), SlotPoolError> {
        let mut times = self.times.lock().expect("slot pool mutex poisoned");
        let position = times
            .iter()
            .position(|offered| *offered == slot)
            .ok_or(SlotPoolError::NotOffered(slot))?;
        times.remove(position);
        let doc = SlotPoolDoc {
            available_times: times.clone(),
        };
        write_document(&self.path, &doc).map_err(|err| SlotPoolError::Unavailable(err.to_string()))
    }
}
