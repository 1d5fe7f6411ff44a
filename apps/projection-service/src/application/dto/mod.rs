//! Data Transfer Objects (DTOs)
//!
//! DTOs are used for API boundaries and use case inputs/outputs.

mod projection_dto;

pub use projection_dto::{
    ProjectionDto, ProjectionRecordDto, ProjectionRequestDto, ProjectionSummaryDto,
};
