//! Trained models: supervised risk classification and unsupervised anomaly
//! scoring. Both consume normalized feature vectors and are persisted as
//! JSON artifacts.

mod evaluation;
mod forest;
mod isolation;

pub use evaluation::{stratified_split, ClassificationReport};
pub use forest::RandomForestClassifier;
pub use isolation::IsolationForest;
