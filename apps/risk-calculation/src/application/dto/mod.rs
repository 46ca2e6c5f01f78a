//! Data Transfer Objects (DTOs)
//!
//! Inputs of a batch calculation and the documents it produces.

mod input_dto;
mod results_dto;

pub use input_dto::{CalculationRequestDto, ExposureRecordDto, MitigationDto};
pub use results_dto::{
    BreakdownEntryDto, CalculatedExposure, CalculatedExposureDto, CalculationResultsDocument,
    ConcentrationIndicesDto, PortfolioAnalysisSummary, ResultsSummaryDto,
};
