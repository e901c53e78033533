//! Model training module
//!
//! Provides the fixed set of regressors trained per request:
//! - Ordinary least squares linear regression
//! - Random forest of CART regression trees
//! - XGBoost-style second-order gradient boosting
//!
//! plus the engine that fits the selected models and averages them.

pub mod config;
pub mod decision_tree;
pub mod engine;
pub mod linear_models;
pub mod models;
pub mod random_forest;
pub mod xgboost;

pub use config::{ModelKind, ModelSelector, ENSEMBLE_NAME, FOREST_TREES, RANDOM_SEED};
pub use decision_tree::{DecisionTree, TreeNode};
pub use engine::{TrainEngine, TrainingResult};
pub use linear_models::LinearRegression;
pub use models::{RegressionMetrics, Regressor};
pub use random_forest::RandomForest;
pub use xgboost::{XGBoostConfig, XGBoostRegressor};
