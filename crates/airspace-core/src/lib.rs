pub mod error;
pub mod index;
pub mod metrics;
pub mod models;
pub mod normalize;
pub mod risk;
pub mod rules;
pub mod spatial;

pub use error::{FetchError, IndexBuildError, MalformedRecord, MappingError};
pub use index::{SpatialIndex, PREFILTER_RADIUS_DEG};
pub use metrics::{CounterMetrics, MetricsSnapshot, NoopMetrics, RiskMetrics};
pub use models::{Alert, PositionedEntity, RiskKind, UNKNOWN_LABEL};
pub use normalize::{normalize, normalize_with_metrics, Arity, FieldMapping, FieldRole, UnitScale};
pub use risk::{detect, RiskDetector};
pub use rules::RiskRules;
pub use spatial::haversine_distance;
