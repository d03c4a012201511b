use studio_core::project::{Project, ProjectDraft};

/// The slice of the project store the authoring wizard needs.
///
/// Callers inject a store; they never touch storage directly.
pub trait ProjectRepository {
    fn get(&self, id: &str) -> Option<&Project>;

    /// Update when the draft's id resolves, create otherwise.
    fn save(&mut self, draft: &ProjectDraft) -> Project;
}

impl<T: ProjectRepository + ?Sized> ProjectRepository for &mut T {
    fn get(&self, id: &str) -> Option<&Project> {
        (**self).get(id)
    }

    fn save(&mut self, draft: &ProjectDraft) -> Project {
        (**self).save(draft)
    }
}
