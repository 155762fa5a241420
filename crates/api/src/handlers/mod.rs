pub mod jobs;
pub mod playbooks;
