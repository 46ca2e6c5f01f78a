//! Calculate Risk Metrics Use Case
//!
//! Runs one batch end to end: values every exposure in EUR, nets its
//! mitigations, accumulates category totals, builds the portfolio analysis,
//! stores it and, when the bank has risk parameters, interprets it.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::application::dto::{
    CalculatedExposure, CalculationRequestDto, CalculationResultsDocument, ExposureRecordDto,
    MitigationDto, PortfolioAnalysisSummary,
};
use crate::application::ports::{
    AnalysisRepositoryPort, EventPublisherPort, ExchangeRateProvider, RepositoryError,
    RiskParametersRepository,
};
use crate::domain::analysis::{
    AnalysisSettings, CategoryTotals, ClassifiedExposure, PortfolioAnalysis,
};
use crate::domain::classification::GeographicClassifier;
use crate::domain::compliance::{ComplianceService, ComplianceVerdict};
use crate::domain::parameters::ParametersError;
use crate::domain::protection::{Mitigation, ProtectedExposure};
use crate::domain::shared::{BankId, BatchId, CurrencyCode, DomainError, ExposureId};
use crate::domain::valuation::{
    CacheStatistics, ExchangeRateCache, ExposureValuation, RateSource, ValuationError,
};

/// Errors that abort a batch calculation.
#[derive(Debug, thiserror::Error)]
pub enum CalculationError {
    /// The request itself is invalid.
    #[error("Invalid calculation request: {0}")]
    InvalidRequest(#[from] DomainError),

    /// One exposure could not be valued, netted or classified.
    #[error("Exposure {exposure_id} failed: {source}")]
    Exposure {
        /// Failing exposure.
        exposure_id: String,
        /// Underlying failure.
        #[source]
        source: ValuationError,
    },

    /// Analysis storage failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Risk parameters could not be loaded.
    #[error(transparent)]
    Parameters(#[from] ParametersError),

    /// Accumulated portfolio totals left the representable amount range.
    #[error("Portfolio totals overflow: {0}")]
    TotalsOverflow(#[source] DomainError),

    /// The worker pool could not be built.
    #[error("Failed to build worker pool: {0}")]
    WorkerPool(String),

    /// The blocking valuation task panicked or was cancelled.
    #[error("Valuation worker failed: {0}")]
    Worker(String),
}

/// Batch processing switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationOptions {
    /// Load every batch currency's EUR rate before netting.
    pub preload_rates: bool,
    /// Exposure count from which the batch is processed in parallel chunks.
    pub parallel_threshold: usize,
    /// Exposures per chunk.
    pub chunk_size: usize,
    /// Worker threads, 0 for the rayon default.
    pub max_threads: usize,
    /// Abort the batch when a rate is unavailable instead of skipping the exposure.
    pub fail_on_unavailable_rate: bool,
}

impl Default for CalculationOptions {
    fn default() -> Self {
        Self {
            preload_rates: true,
            parallel_threshold: 2000,
            chunk_size: 500,
            max_threads: 0,
            fail_on_unavailable_rate: true,
        }
    }
}

/// An exposure left out of the analysis because its rate was unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedExposure {
    /// Exposure ID.
    pub exposure_id: String,
    /// Why the exposure was skipped.
    pub reason: String,
}

/// Result of one batch calculation.
#[derive(Debug, Clone)]
pub struct CalculationOutcome {
    /// Bank the batch belongs to.
    pub bank_id: BankId,
    /// The stored analysis.
    pub analysis: PortfolioAnalysis,
    /// Calculated exposures in request order.
    pub exposures: Vec<CalculatedExposure>,
    /// Exposures skipped for missing rates.
    pub skipped: Vec<SkippedExposure>,
    /// Interpretation against the bank's risk parameters, if any are stored.
    pub verdict: Option<ComplianceVerdict>,
    /// Rate cache counters, merged across chunks.
    pub cache_statistics: CacheStatistics,
    /// Number of chunks processed.
    pub chunk_count: usize,
    /// Wall-clock processing time.
    pub elapsed_ms: u64,
    /// Whether the completion event reached the publisher.
    pub events_published: bool,
}

impl CalculationOutcome {
    /// JSON results document of this batch.
    #[must_use]
    pub fn results_document(&self) -> CalculationResultsDocument {
        CalculationResultsDocument::new(&self.bank_id, &self.analysis, &self.exposures)
    }

    /// Summary row of this batch.
    #[must_use]
    pub fn summary(&self) -> PortfolioAnalysisSummary {
        PortfolioAnalysisSummary::from(&self.analysis)
    }
}

/// Use case for calculating concentration metrics of one batch.
pub struct CalculateRiskMetricsUseCase<A, P, E>
where
    A: AnalysisRepositoryPort,
    P: RiskParametersRepository,
    E: EventPublisherPort,
{
    analysis_repo: Arc<A>,
    parameters_repo: Arc<P>,
    event_publisher: Arc<E>,
    rate_provider: Arc<dyn ExchangeRateProvider>,
    classifier: GeographicClassifier,
    settings: AnalysisSettings,
    options: CalculationOptions,
    worker_pool: Mutex<Option<Arc<ThreadPool>>>,
}

impl<A, P, E> CalculateRiskMetricsUseCase<A, P, E>
where
    A: AnalysisRepositoryPort,
    P: RiskParametersRepository,
    E: EventPublisherPort,
{
    /// Create a new use case with default settings.
    pub fn new(
        analysis_repo: Arc<A>,
        parameters_repo: Arc<P>,
        event_publisher: Arc<E>,
        rate_provider: Arc<dyn ExchangeRateProvider>,
    ) -> Self {
        Self {
            analysis_repo,
            parameters_repo,
            event_publisher,
            rate_provider,
            classifier: GeographicClassifier::default(),
            settings: AnalysisSettings::default(),
            options: CalculationOptions::default(),
            worker_pool: Mutex::new(None),
        }
    }

    /// Replace the HHI bands and percentage scale.
    #[must_use]
    pub const fn with_settings(mut self, settings: AnalysisSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Replace the geographic classifier.
    #[must_use]
    pub fn with_classifier(mut self, classifier: GeographicClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Replace the processing options.
    #[must_use]
    pub fn with_options(mut self, options: CalculationOptions) -> Self {
        self.options = options;
        self.worker_pool = Mutex::new(None);
        self
    }

    /// Execute the use case.
    ///
    /// Valuation and netting run on tokio's blocking pool, so the rate
    /// provider may block. Large batches are fanned out over rayon.
    ///
    /// # Errors
    ///
    /// Returns error if the request is invalid, an exposure fails (rate
    /// failures only when `fail_on_unavailable_rate` is set), or storage fails.
    pub async fn execute(
        &self,
        request: CalculationRequestDto,
    ) -> Result<CalculationOutcome, CalculationError> {
        let started = Instant::now();
        let request = request.normalized();
        let batch_id = BatchId::new(request.batch_id.trim());
        let bank_id = BankId::new(request.bank_id.trim());
        if batch_id.is_blank() {
            return Err(DomainError::invalid("batch_id", "batch id cannot be blank").into());
        }
        if bank_id.is_blank() {
            return Err(DomainError::invalid("bank_id", "bank id cannot be blank").into());
        }

        info!(
            batch_id = %batch_id,
            bank_id = %bank_id,
            exposures = request.exposures.len(),
            as_of = %request.as_of,
            "Starting risk calculation"
        );

        // 1-2. Rates, valuation, netting and accumulation on the blocking pool
        let processor = BatchProcessor {
            rate_provider: Arc::clone(&self.rate_provider),
            classifier: self.classifier.clone(),
            options: self.options,
            pool: self.worker_pool()?,
        };
        let (batch, cache_statistics, chunk_count) =
            tokio::task::spawn_blocking(move || processor.run(&request))
                .await
                .map_err(|e| CalculationError::Worker(e.to_string()))??;

        // 3. Analysis
        let analysis = PortfolioAnalysis::from_totals(batch_id, batch.totals, &self.settings)?;
        self.analysis_repo.save(&analysis).await?;

        // 4. Interpretation
        let verdict = self
            .parameters_repo
            .find_by_bank_id(&bank_id)
            .await?
            .map(|parameters| {
                ComplianceService::new(&parameters)
                    .evaluate(&analysis, batch.exposures.iter().map(|e| &e.classified.exposure))
            });
        if verdict.is_none() {
            debug!(bank_id = %bank_id, "No risk parameters stored, skipping interpretation");
        }

        // 5. Completion event
        let events_published = match self
            .event_publisher
            .publish_event(analysis.completion_event().into())
            .await
        {
            Ok(()) => true,
            Err(e) => {
                error!(batch_id = %analysis.batch_id(), error = %e, "Failed to publish events");
                false
            }
        };

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(
            batch_id = %analysis.batch_id(),
            total_portfolio_eur = %analysis.total_portfolio_eur(),
            geographic_hhi = %analysis.geographic_hhi().value(),
            sector_hhi = %analysis.sector_hhi().value(),
            skipped = batch.skipped.len(),
            chunks = chunk_count,
            cache_hit_rate = cache_statistics.hit_rate(),
            elapsed_ms,
            "Risk calculation completed"
        );

        Ok(CalculationOutcome {
            bank_id,
            analysis,
            exposures: batch.exposures,
            skipped: batch.skipped,
            verdict,
            cache_statistics,
            chunk_count,
            elapsed_ms,
            events_published,
        })
    }

    /// Sized rayon pool, built on first use; `None` for the global pool.
    fn worker_pool(&self) -> Result<Option<Arc<ThreadPool>>, CalculationError> {
        if self.options.max_threads == 0 {
            return Ok(None);
        }
        let mut pool = self
            .worker_pool
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(pool) = pool.as_ref() {
            return Ok(Some(Arc::clone(pool)));
        }
        let built = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(self.options.max_threads)
                .build()
                .map_err(|e| CalculationError::WorkerPool(e.to_string()))?,
        );
        *pool = Some(Arc::clone(&built));
        Ok(Some(built))
    }
}

/// Steps that call the rate provider, run off the async runtime.
struct BatchProcessor {
    rate_provider: Arc<dyn ExchangeRateProvider>,
    classifier: GeographicClassifier,
    options: CalculationOptions,
    pool: Option<Arc<ThreadPool>>,
}

impl BatchProcessor {
    fn run(
        &self,
        request: &CalculationRequestDto,
    ) -> Result<(BatchAccumulator, CacheStatistics, usize), CalculationError> {
        let mut cache = ExchangeRateCache::new(Arc::clone(&self.rate_provider), request.as_of);
        if self.options.preload_rates {
            let currencies: Vec<CurrencyCode> = request
                .currencies()
                .iter()
                .filter_map(|code| CurrencyCode::new(code).ok())
                .collect();
            cache.preload_rates(&currencies, &CurrencyCode::eur());
        }

        if request.exposures.len() >= self.options.parallel_threshold {
            return self.process_in_chunks(request, &cache);
        }
        let batch = process_records(
            &request.exposures,
            request,
            &self.classifier,
            self.options.fail_on_unavailable_rate,
            &mut cache,
        )?;
        Ok((batch, cache.statistics(), 1))
    }

    /// Process the batch in chunks, each with a fork of the preloaded cache.
    ///
    /// Raw totals are merged in chunk order; shares and HHIs are computed
    /// once afterwards.
    fn process_in_chunks(
        &self,
        request: &CalculationRequestDto,
        cache: &ExchangeRateCache,
    ) -> Result<(BatchAccumulator, CacheStatistics, usize), CalculationError> {
        let chunk_size = self.options.chunk_size.max(1);
        let classifier = &self.classifier;
        let fail_on_unavailable_rate = self.options.fail_on_unavailable_rate;

        let run = || {
            request
                .exposures
                .par_chunks(chunk_size)
                .map(|chunk| {
                    let mut rates = cache.fork();
                    let batch = process_records(
                        chunk,
                        request,
                        classifier,
                        fail_on_unavailable_rate,
                        &mut rates,
                    )?;
                    Ok((batch, rates.statistics()))
                })
                .collect::<Result<Vec<_>, CalculationError>>()
        };

        let chunks = match &self.pool {
            Some(pool) => pool.install(run)?,
            None => run()?,
        };

        let chunk_count = chunks.len();
        let mut merged = BatchAccumulator::default();
        let mut statistics = cache.statistics();
        for (batch, chunk_statistics) in chunks {
            merged.merge(batch)?;
            statistics.merge(&chunk_statistics);
        }
        debug!(chunk_count, chunk_size, "Merged chunk totals");

        Ok((merged, statistics, chunk_count))
    }
}

/// Calculated exposures and raw totals of one chunk.
#[derive(Debug, Default)]
struct BatchAccumulator {
    exposures: Vec<CalculatedExposure>,
    totals: CategoryTotals,
    skipped: Vec<SkippedExposure>,
}

impl BatchAccumulator {
    fn push(&mut self, exposure: CalculatedExposure) -> Result<(), CalculationError> {
        self.totals
            .add(&exposure.classified)
            .map_err(CalculationError::TotalsOverflow)?;
        self.exposures.push(exposure);
        Ok(())
    }

    fn merge(&mut self, other: Self) -> Result<(), CalculationError> {
        self.totals
            .merge(other.totals)
            .map_err(CalculationError::TotalsOverflow)?;
        self.exposures.extend(other.exposures);
        self.skipped.extend(other.skipped);
        Ok(())
    }
}

fn process_records(
    records: &[ExposureRecordDto],
    request: &CalculationRequestDto,
    classifier: &GeographicClassifier,
    fail_on_unavailable_rate: bool,
    rates: &mut impl RateSource,
) -> Result<BatchAccumulator, CalculationError> {
    let mut batch = BatchAccumulator::default();
    for record in records {
        let exposure_id = record.exposure_id.trim();
        let mitigations = request.mitigations_for(exposure_id);
        match calculate_exposure(exposure_id, record, mitigations, classifier, rates) {
            Ok(exposure) => batch.push(exposure)?,
            Err(source) if source.is_rate_unavailable() && !fail_on_unavailable_rate => {
                warn!(
                    exposure_id = %exposure_id,
                    error = %source,
                    "Skipping exposure without exchange rate"
                );
                batch.skipped.push(SkippedExposure {
                    exposure_id: exposure_id.to_string(),
                    reason: source.to_string(),
                });
            }
            Err(source) => {
                return Err(CalculationError::Exposure {
                    exposure_id: exposure_id.to_string(),
                    source,
                });
            }
        }
    }
    Ok(batch)
}

fn calculate_exposure(
    exposure_id: &str,
    record: &ExposureRecordDto,
    mitigation_records: &[MitigationDto],
    classifier: &GeographicClassifier,
    rates: &mut impl RateSource,
) -> Result<CalculatedExposure, ValuationError> {
    let exposure_id = ExposureId::new(exposure_id);
    let currency = CurrencyCode::new(&record.currency)?;
    let valuation =
        ExposureValuation::convert(exposure_id.clone(), record.gross_amount, currency, rates)?;

    let mut mitigations = Vec::with_capacity(mitigation_records.len());
    for m in mitigation_records {
        mitigations.push(Mitigation::create(
            m.mitigation_type,
            m.value,
            &m.currency,
            rates,
        )?);
    }

    let protected = ProtectedExposure::calculate(exposure_id, valuation.eur_amount(), mitigations)?;
    let region = record.resolve_region(classifier)?;

    Ok(CalculatedExposure {
        valuation,
        classified: ClassifiedExposure::new(protected, region, record.sector),
        country_code: record
            .country_code
            .as_ref()
            .map(|c| c.trim().to_ascii_uppercase()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{InMemoryAnalysisRepository, NoOpEventPublisher};
    use crate::domain::analysis::{GeographicRegion, SectorCategory};
    use crate::domain::parameters::RiskParameters;
    use crate::domain::protection::MitigationType;
    use crate::domain::shared::RiskParametersId;
    use crate::domain::valuation::ExchangeRate;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    struct NoParameters;

    #[async_trait]
    impl RiskParametersRepository for NoParameters {
        async fn save(&self, _parameters: &RiskParameters) -> Result<u64, ParametersError> {
            Ok(1)
        }

        async fn find_by_bank_id(
            &self,
            _bank_id: &BankId,
        ) -> Result<Option<RiskParameters>, ParametersError> {
            Ok(None)
        }

        async fn find_by_id(
            &self,
            _id: &RiskParametersId,
        ) -> Result<Option<RiskParameters>, ParametersError> {
            Ok(None)
        }
    }

    fn usd_only_provider() -> Arc<dyn ExchangeRateProvider> {
        Arc::new(
            |from: &CurrencyCode,
             to: &CurrencyCode,
             date: NaiveDate|
             -> Result<ExchangeRate, ValuationError> {
                if from.as_str() == "USD" {
                    ExchangeRate::new(dec!(1.2), from.clone(), to.clone(), date)
                } else {
                    Err(ValuationError::RateUnavailable {
                        pair: crate::domain::shared::CurrencyPair::new(from.clone(), to.clone()),
                        date,
                        reason: "no quote".to_string(),
                    })
                }
            },
        )
    }

    fn use_case(
        options: CalculationOptions,
    ) -> CalculateRiskMetricsUseCase<InMemoryAnalysisRepository, NoParameters, NoOpEventPublisher>
    {
        CalculateRiskMetricsUseCase::new(
            Arc::new(InMemoryAnalysisRepository::new()),
            Arc::new(NoParameters),
            Arc::new(NoOpEventPublisher),
            usd_only_provider(),
        )
        .with_options(options)
    }

    fn request(exposures: Vec<ExposureRecordDto>) -> CalculationRequestDto {
        CalculationRequestDto {
            batch_id: "BATCH-1".to_string(),
            bank_id: "BANK-1".to_string(),
            as_of: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap(),
            exposures,
            mitigations: HashMap::new(),
        }
    }

    fn record(id: &str, amount: Decimal, currency: &str) -> ExposureRecordDto {
        ExposureRecordDto::new(
            id,
            amount,
            currency,
            GeographicRegion::Italy,
            SectorCategory::Corporate,
        )
    }

    #[tokio::test]
    async fn nets_usd_mitigation() {
        let mut req = request(vec![record("E1", dec!(100000), "EUR")]);
        req.mitigations.insert(
            "E1".to_string(),
            vec![MitigationDto::new(MitigationType::Guarantee, dec!(12000), "USD")],
        );

        let outcome = use_case(CalculationOptions::default()).execute(req).await.unwrap();

        assert_eq!(outcome.analysis.total_portfolio_eur().value(), dec!(85600));
        assert_eq!(outcome.exposures.len(), 1);
        assert!(outcome.verdict.is_none());
        assert!(outcome.events_published);
        assert_eq!(outcome.chunk_count, 1);
    }

    #[tokio::test]
    async fn blank_batch_id_is_rejected() {
        let mut req = request(vec![]);
        req.batch_id = "  ".to_string();
        let err = use_case(CalculationOptions::default()).execute(req).await.unwrap_err();
        assert!(matches!(err, CalculationError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn unavailable_rate_fails_batch_by_default() {
        let req = request(vec![
            record("E1", dec!(1000), "EUR"),
            record("E2", dec!(1000), "GBP"),
        ]);
        let err = use_case(CalculationOptions::default()).execute(req).await.unwrap_err();
        match err {
            CalculationError::Exposure { exposure_id, source } => {
                assert_eq!(exposure_id, "E2");
                assert!(source.is_rate_unavailable());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn unavailable_rate_skips_exposure_when_allowed() {
        let req = request(vec![
            record("E1", dec!(1000), "EUR"),
            record("E2", dec!(1000), "GBP"),
        ]);
        let options = CalculationOptions {
            fail_on_unavailable_rate: false,
            ..CalculationOptions::default()
        };
        let outcome = use_case(options).execute(req).await.unwrap();

        assert_eq!(outcome.analysis.total_exposures(), 1);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].exposure_id, "E2");
    }

    #[tokio::test]
    async fn invalid_currency_is_never_skipped() {
        let req = request(vec![record("E1", dec!(1000), "EURO")]);
        let options = CalculationOptions {
            fail_on_unavailable_rate: false,
            ..CalculationOptions::default()
        };
        let err = use_case(options).execute(req).await.unwrap_err();
        assert!(matches!(err, CalculationError::Exposure { .. }));
    }

    #[tokio::test]
    async fn chunked_processing_keeps_request_order() {
        let exposures: Vec<ExposureRecordDto> = (0..25)
            .map(|i| record(&format!("E{i:02}"), Decimal::from(1000 + i), "USD"))
            .collect();
        let options = CalculationOptions {
            parallel_threshold: 10,
            chunk_size: 4,
            max_threads: 2,
            ..CalculationOptions::default()
        };
        let outcome = use_case(options).execute(request(exposures)).await.unwrap();

        assert_eq!(outcome.chunk_count, 7);
        let ids: Vec<String> = outcome
            .exposures
            .iter()
            .map(|e| e.valuation.exposure_id().to_string())
            .collect();
        let expected: Vec<String> = (0..25).map(|i| format!("E{i:02}")).collect();
        assert_eq!(ids, expected);
        // USD preloaded once; every chunk lookup is a hit
        assert_eq!(outcome.cache_statistics.misses, 1);
        assert_eq!(outcome.cache_statistics.hits, 25);
    }

    #[tokio::test]
    async fn provider_runs_off_the_async_task() {
        let caller = std::thread::current().id();
        let provider_threads = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&provider_threads);
        let provider: Arc<dyn ExchangeRateProvider> = Arc::new(
            move |from: &CurrencyCode,
                  to: &CurrencyCode,
                  date: NaiveDate|
                  -> Result<ExchangeRate, ValuationError> {
                seen.lock().unwrap().push(std::thread::current().id());
                ExchangeRate::new(dec!(1.2), from.clone(), to.clone(), date)
            },
        );
        let use_case = CalculateRiskMetricsUseCase::new(
            Arc::new(InMemoryAnalysisRepository::new()),
            Arc::new(NoParameters),
            Arc::new(NoOpEventPublisher),
            provider,
        );

        use_case
            .execute(request(vec![record("E1", dec!(1000), "USD")]))
            .await
            .unwrap();

        let threads = provider_threads.lock().unwrap();
        assert!(!threads.is_empty());
        assert!(threads.iter().all(|id| *id != caller));
    }

    #[test]
    fn sized_worker_pool_is_reused() {
        let options = CalculationOptions {
            max_threads: 2,
            ..CalculationOptions::default()
        };
        let sized = use_case(options);

        let first = sized.worker_pool().unwrap().unwrap();
        let second = sized.worker_pool().unwrap().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.current_num_threads(), 2);

        let global = use_case(CalculationOptions::default()).worker_pool().unwrap();
        assert!(global.is_none());
    }
}
