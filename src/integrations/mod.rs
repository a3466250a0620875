// HTTP clients for the external collaborators
pub mod agmark;
pub mod groq;
pub mod inference;

pub use agmark::AgmarkClient;
pub use groq::GroqClient;
pub use inference::InferenceClient;
