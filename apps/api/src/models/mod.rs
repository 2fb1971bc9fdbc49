pub mod resume;

pub use resume::{
    Contact, EducationEntry, ExperienceEntry, OptimizedSections, ParsedResume, ProjectEntry,
};
