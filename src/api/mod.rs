// External collaborators, each behind a narrow port: the extraction service
// (auto-fill) and the submission sink (analysis service).

pub mod extraction;
pub mod submission;
