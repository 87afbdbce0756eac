use crate::core::search::find_optimal_gear;
use crate::core::{BestResult, RequestSource};
use crate::utils::error::Result;
use std::time::Instant;

pub struct GearFinder<R: RequestSource> {
    source: R,
}

impl<R: RequestSource> GearFinder<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    pub fn run(&self) -> Result<BestResult> {
        let request = self.source.search_request()?;

        tracing::info!(
            "Searching gears for {:.1} kg, {:.0} m over {:.2} km, target {:.0} W",
            request.profile.mass_kg,
            request.profile.elevation_gain_m,
            request.profile.climb_length_km,
            request.target_power_w
        );
        tracing::debug!(
            "Domains: {} chainrings x {} sprockets x {} cadences = {} candidates",
            request.domains.chainrings.len(),
            request.domains.sprockets.len(),
            request.domains.cadences.len(),
            request.domains.candidate_count()
        );

        if request.profile.elevation_gain_m == 0.0 {
            tracing::warn!("Climb is flat, every candidate implies 0 W");
        }

        let started = Instant::now();
        let result = find_optimal_gear(&request)?;

        tracing::debug!(
            "Evaluated {} candidates in {:?}",
            result.evaluated_candidates,
            started.elapsed()
        );
        tracing::info!(
            "Best: {}x{} @ {} rpm, ratio {:.2}, {:.2} km/h, {:.1} W (off by {:.2} W)",
            result.chainring_teeth,
            result.sprocket_teeth,
            result.cadence_rpm,
            result.gear_ratio,
            result.speed_kmh,
            result.power_w,
            result.deviation_w
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ClimbProfile, GearSearchRequest, SearchDomains};
    use crate::utils::error::GearError;

    struct FixedSource(GearSearchRequest);

    impl RequestSource for FixedSource {
        fn search_request(&self) -> Result<GearSearchRequest> {
            Ok(self.0.clone())
        }
    }

    struct BrokenSource;

    impl RequestSource for BrokenSource {
        fn search_request(&self) -> Result<GearSearchRequest> {
            Err(GearError::MissingConfigError {
                field: "climb".to_string(),
            })
        }
    }

    #[test]
    fn test_engine_runs_search() {
        let request = GearSearchRequest::new(ClimbProfile::new(70.0, 300.0, 4.0), 220.0, 2.136)
            .with_domains(SearchDomains::with_overrides(Some(vec![34, 50]), None, None));

        let finder = GearFinder::new(FixedSource(request.clone()));
        let result = finder.run().unwrap();

        assert_eq!(result, find_optimal_gear(&request).unwrap());
        assert!([34, 50].contains(&result.chainring_teeth));
    }

    #[test]
    fn test_engine_propagates_source_errors() {
        let finder = GearFinder::new(BrokenSource);
        assert!(matches!(
            finder.run(),
            Err(GearError::MissingConfigError { .. })
        ));
    }
}
