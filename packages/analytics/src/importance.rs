//! Feature-importance ranking for the bar chart.

use rent_predictor_analytics_models::{FeatureImportanceOutcome, RankedFeature};
use rent_predictor_model::{ModelError, RentOracle};

/// Shown when the model cannot report importances.
pub const UNAVAILABLE_REASON: &str =
    "No se pudo obtener la importancia de las características sin un conjunto de datos de prueba.";

/// Chart title for the importance ranking.
pub const CHART_TITLE: &str = "Importancia de las Características en la Predicción del Alquiler";

/// Asks the model for its feature importances and ranks them.
///
/// Never fails: any model error degrades to
/// [`FeatureImportanceOutcome::Unavailable`].
#[must_use]
pub fn feature_importance_ranking(oracle: &dyn RentOracle) -> FeatureImportanceOutcome {
    match oracle.feature_importance() {
        Ok(scores) => FeatureImportanceOutcome::Available {
            features: rank_ascending(scores),
        },
        Err(ModelError::InsufficientData) => {
            log::info!("Feature importance unavailable: no held-out evaluation set");
            FeatureImportanceOutcome::Unavailable {
                reason: UNAVAILABLE_REASON.to_string(),
            }
        }
        Err(e) => {
            log::warn!("Feature importance failed: {e}");
            FeatureImportanceOutcome::Unavailable {
                reason: UNAVAILABLE_REASON.to_string(),
            }
        }
    }
}

/// Sorts scores ascending and assigns ranks, 1 being the most important.
fn rank_ascending(mut scores: Vec<(String, f64)>) -> Vec<RankedFeature> {
    scores.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    let total = scores.len();
    scores
        .into_iter()
        .enumerate()
        .map(|(idx, (feature, importance))| RankedFeature {
            rank: total - idx,
            feature,
            importance,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rent_predictor_property_models::FeatureRow;

    struct StubOracle {
        importance: fn() -> Result<Vec<(String, f64)>, ModelError>,
    }

    impl RentOracle for StubOracle {
        fn predict(&self, _row: &FeatureRow) -> Result<f64, ModelError> {
            Ok(0.0)
        }

        fn feature_importance(&self) -> Result<Vec<(String, f64)>, ModelError> {
            (self.importance)()
        }
    }

    #[test]
    fn insufficient_data_degrades_to_unavailable() {
        let oracle = StubOracle {
            importance: || Err(ModelError::InsufficientData),
        };
        assert_eq!(
            feature_importance_ranking(&oracle),
            FeatureImportanceOutcome::Unavailable {
                reason: UNAVAILABLE_REASON.to_string()
            }
        );
    }

    #[test]
    fn other_model_errors_also_degrade() {
        let oracle = StubOracle {
            importance: || {
                Err(ModelError::Incompatible {
                    message: "broken".to_string(),
                })
            },
        };
        assert!(matches!(
            feature_importance_ranking(&oracle),
            FeatureImportanceOutcome::Unavailable { .. }
        ));
    }

    #[test]
    fn ranks_least_important_first() {
        let oracle = StubOracle {
            importance: || {
                Ok(vec![
                    ("area".to_string(), 0.40),
                    ("city".to_string(), 0.10),
                    ("fire insurance (R$)".to_string(), 0.95),
                    ("rooms".to_string(), -0.02),
                ])
            },
        };
        let FeatureImportanceOutcome::Available { features } = feature_importance_ranking(&oracle)
        else {
            panic!("expected importances");
        };
        let names: Vec<&str> = features.iter().map(|f| f.feature.as_str()).collect();
        assert_eq!(names, ["rooms", "city", "area", "fire insurance (R$)"]);
        assert_eq!(features.first().map(|f| f.rank), Some(4));
        assert_eq!(features.last().map(|f| f.rank), Some(1));
    }
}
