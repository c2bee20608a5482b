//! Terminal renderings of the model and dataset analytics.

use rent_predictor_analytics::aggregate::{MAP_TITLE, summarize_cities};
use rent_predictor_analytics::dataset::load_dataset;
use rent_predictor_analytics::importance::{CHART_TITLE, feature_importance_ranking};
use rent_predictor_analytics_models::FeatureImportanceOutcome;
use rent_predictor_geography::CityCoordinateTable;
use rent_predictor_model::ModelHandle;
use rent_predictor_server::ServerConfig;
use rent_predictor_server_models::CURRENCY;

/// Prints the features from most to least important.
pub fn feature_importance(config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let model = ModelHandle::load(&config.model_path)?;

    println!();
    println!("{CHART_TITLE}");
    match feature_importance_ranking(&model) {
        FeatureImportanceOutcome::Available { features } => {
            for feature in features.iter().rev() {
                println!(
                    "{:>3}. {:<24} {:.4}",
                    feature.rank, feature.feature, feature.importance
                );
            }
        }
        FeatureImportanceOutcome::Unavailable { reason } => println!("{reason}"),
    }

    Ok(())
}

/// Prints the average rent of every city in the dataset.
pub fn city_rents(config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let listings = load_dataset(&config.dataset_path)?;
    let summaries = summarize_cities(&listings, &CityCoordinateTable::builtin());
    log::debug!("Summarized {} listings into {} cities", listings.len(), summaries.len());

    println!();
    println!("{MAP_TITLE}");
    for summary in &summaries {
        let location = summary.coordinates.map_or_else(
            || "sin coordenadas".to_string(),
            |c| format!("{:.4}, {:.4}", c.latitude, c.longitude),
        );
        println!(
            "{:<20} {CURRENCY} {:>10.2}  ({} listings, {location})",
            summary.city, summary.average_rent, summary.listings
        );
    }

    Ok(())
}
