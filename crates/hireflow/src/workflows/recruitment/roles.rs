use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use super::domain::{Question, RoleId};

/// Error enumeration for role/question store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("role '{0}' not found")]
    RoleNotFound(String),
    #[error("question {index} not found for role '{role}'")]
    QuestionNotFound { role: String, index: usize },
    #[error("a question needs at least two distinct options")]
    TooFewOptions,
    #[error("the correct answer must be one of the options")]
    AnswerNotAnOption,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction for the role catalog and its question banks.
///
/// Mutations persist immediately; implementations rewrite whole documents per
/// change, which is fine for a single active administrator but loses updates
/// under concurrent writers (documented limitation, not fixed here).
pub trait RoleStore: Send + Sync {
    fn list_roles(&self) -> Result<Vec<RoleId>, StoreError>;
    fn get_requirement(&self, role: &RoleId) -> Result<Option<String>, StoreError>;
    fn upsert_role(&self, role: &RoleId, requirement: &str) -> Result<(), StoreError>;
    /// Removes the role's requirement entry only. Its question bank is
    /// deliberately orphaned, not cascade-deleted.
    fn delete_role(&self, role: &RoleId) -> Result<(), StoreError>;
    fn list_questions(&self, role: &RoleId) -> Result<Vec<Question>, StoreError>;
    fn add_question(&self, role: &RoleId, question: Question) -> Result<(), StoreError>;
    fn update_question(
        &self,
        role: &RoleId,
        index: usize,
        question: Question,
    ) -> Result<(), StoreError>;
    fn delete_question(&self, role: &RoleId, index: usize) -> Result<(), StoreError>;
}

/// Validates a question before it enters the bank: at least two distinct
/// options and an answer that matches one of them.
pub fn validate_question(question: &Question) -> Result<(), StoreError> {
    let distinct: HashSet<&str> = question.options.iter().map(String::as_str).collect();
    if distinct.len() < 2 {
        return Err(StoreError::TooFewOptions);
    }
    if !question.options.contains(&question.answer) {
        return Err(StoreError::AnswerNotAnOption);
    }
    Ok(())
}

/// The built-in role catalog seeded when a store starts empty.
pub fn default_roles() -> Vec<(RoleId, String)> {
    let catalog = [
        (
            "ai_ml_engineer",
            "Required Skills:\n\
             - Python, PyTorch/TensorFlow\n\
             - Machine Learning algorithms and frameworks\n\
             - Deep Learning and Neural Networks\n\
             - Data preprocessing and analysis\n\
             - MLOps and model deployment\n\
             - RAG, LLM, Finetuning and Prompt Engineering",
        ),
        (
            "frontend_engineer",
            "Required Skills:\n\
             - React/Vue.js/Angular\n\
             - HTML5, CSS3, JavaScript/TypeScript\n\
             - Responsive design\n\
             - State management\n\
             - Frontend testing",
        ),
        (
            "backend_engineer",
            "Required Skills:\n\
             - Python/Java/Node.js\n\
             - REST APIs\n\
             - Database design and management\n\
             - System architecture\n\
             - Cloud services (AWS/GCP/Azure)\n\
             - Kubernetes, Docker, CI/CD",
        ),
    ];

    catalog
        .into_iter()
        .map(|(id, text)| (RoleId(id.to_string()), text.to_string()))
        .collect()
}

/// Seeds the built-in catalog into an empty store. A store that already
/// lists roles is left alone.
pub fn seed_default_roles(store: &dyn RoleStore) -> Result<(), StoreError> {
    if !store.list_roles()?.is_empty() {
        return Ok(());
    }
    for (role, requirement) in default_roles() {
        store.upsert_role(&role, &requirement)?;
    }
    Ok(())
}

type RequirementsDoc = BTreeMap<String, String>;
type QuestionBankDoc = BTreeMap<String, Vec<Question>>;

#[derive(Default)]
struct RoleBooks {
    requirements: RequirementsDoc,
    questions: QuestionBankDoc,
}

/// File-backed store over two JSON documents: the role-requirements map and
/// the question bank. Missing or corrupt documents load as empty.
pub struct JsonRoleStore {
    requirements_path: PathBuf,
    questions_path: PathBuf,
    books: Mutex<RoleBooks>,
}

impl JsonRoleStore {
    pub fn open(
        requirements_path: impl Into<PathBuf>,
        questions_path: impl Into<PathBuf>,
    ) -> Self {
        let requirements_path = requirements_path.into();
        let questions_path = questions_path.into();
        let books = RoleBooks {
            requirements: load_document(&requirements_path),
            questions: load_document(&questions_path),
        };
        Self {
            requirements_path,
            questions_path,
            books: Mutex::new(books),
        }
    }

    fn persist_requirements(&self, doc: &RequirementsDoc) -> Result<(), StoreError> {
        write_document(&self.requirements_path, doc)
    }

    fn persist_questions(&self, doc: &QuestionBankDoc) -> Result<(), StoreError> {
        write_document(&self.questions_path, doc)
    }
}

impl RoleStore for JsonRoleStore {
    fn list_roles(&self) -> Result<Vec<RoleId>, StoreError> {
        let books = self.books.lock().expect("role store mutex poisoned");
        Ok(books
            .requirements
            .keys()
            .map(|id| RoleId(id.clone()))
            .collect())
    }

    fn get_requirement(&self, role: &RoleId) -> Result<Option<String>, StoreError> {
        let books = self.books.lock().expect("role store mutex poisoned");
        Ok(books.requirements.get(&role.0).cloned())
    }

    fn upsert_role(&self, role: &RoleId, requirement: &str) -> Result<(), StoreError> {
        let mut books = self.books.lock().expect("role store mutex poisoned");
        books
            .requirements
            .insert(role.0.clone(), requirement.to_string());
        self.persist_requirements(&books.requirements)
    }

    fn delete_role(&self, role: &RoleId) -> Result<(), StoreError> {
        let mut books = self.books.lock().expect("role store mutex poisoned");
        if books.requirements.remove(&role.0).is_none() {
            return Err(StoreError::RoleNotFound(role.0.clone()));
        }
        self.persist_requirements(&books.requirements)
    }

    fn list_questions(&self, role: &RoleId) -> Result<Vec<Question>, StoreError> {
        let books = self.books.lock().expect("role store mutex poisoned");
        Ok(books.questions.get(&role.0).cloned().unwrap_or_default())
    }

    fn add_question(&self, role: &RoleId, question: Question) -> Result<(), StoreError> {
        validate_question(&question)?;
        let mut books = self.books.lock().expect("role store mutex poisoned");
        books
            .questions
            .entry(role.0.clone())
            .or_default()
            .push(question);
        self.persist_questions(&books.questions)
    }

    fn update_question(
        &self,
        role: &RoleId,
        index: usize,
        question: Question,
    ) -> Result<(), StoreError> {
        validate_question(&question)?;
        let mut books = self.books.lock().expect("role store mutex poisoned");
        let bank = books
            .questions
            .get_mut(&role.0)
            .ok_or_else(|| StoreError::RoleNotFound(role.0.clone()))?;
        let slot = bank
            .get_mut(index)
            .ok_or_else(|| StoreError::QuestionNotFound {
                role: role.0.clone(),
                index,
            })?;
        *slot = question;
        self.persist_questions(&books.questions)
    }

    fn delete_question(&self, role: &RoleId, index: usize) -> Result<(), StoreError> {
        let mut books = self.books.lock().expect("role store mutex poisoned");
        let bank = books
            .questions
            .get_mut(&role.0)
            .ok_or_else(|| StoreError::RoleNotFound(role.0.clone()))?;
        if index >= bank.len() {
            return Err(StoreError::QuestionNotFound {
                role: role.0.clone(),
                index,
            });
        }
        bank.remove(index);
        self.persist_questions(&books.questions)
    }
}

pub(crate) fn load_document<T: DeserializeOwned + Default>(path: &Path) -> T {
    match fs::read(path) {
        Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|err| {
            warn!(path = %path.display(), %err, "corrupt store document, starting empty");
            T::default()
        }),
        Err(_) => T::default(),
    }
}

pub(crate) fn write_document<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(value)
        .map_err(|err| StoreError::Unavailable(err.to_string()))?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| StoreError::Unavailable(err.to_string()))?;
        }
    }
    fs::write(path, bytes).map_err(|err| StoreError::Unavailable(err.to_string()))
}
