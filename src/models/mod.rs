pub mod certificate;
pub mod course;
pub mod module;
pub mod progress;
pub mod projection;
pub mod quiz;

pub use certificate::CourseCertificate;
pub use course::{Course, Difficulty};
pub use module::{CalloutType, CourseModule, LessonSection, ModuleContent};
pub use progress::{
    CompleteModuleRequest, CourseStatus, StartCourseRequest, UserCourseProgress, UserModuleProgress,
};
pub use projection::{CourseWithProgress, ModuleWithProgress};
pub use quiz::{NewQuizAttempt, QuestionKind, QuizAttempt, QuizQuestion, SubmitAttemptRequest};
