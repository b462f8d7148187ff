//! Repository abstractions for data access.

pub mod audit;
pub mod business_area;
pub mod record;
pub mod user;

pub use audit::AuditLogRepository;
pub use business_area::BusinessAreaRepository;
pub use record::{
    FeedbackSystemRepository, MonitoringControlRepository, ProcessRepository,
    QmsAssessmentRepository, QualityObjectiveRepository, RecordAdapter, RiskMatrixRepository,
    ThirdPartyEvaluationRepository, TrainingSessionRepository,
};
pub use user::UserRepository;
