mod persistence;
mod vector;

pub use persistence::{EntityDraft, FactDraft, IPersistenceAdapter};
pub use vector::IVectorBackend;
