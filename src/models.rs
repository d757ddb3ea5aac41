pub mod issue;
pub mod project;
