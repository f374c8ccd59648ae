//! Validation error counting and comparison

pub mod err_counter;
pub mod pydantic_errs;

pub use err_counter::{CategoryDiff, ErrCounter, ValidationErrCounter, validation_err_diff};
pub use pydantic_errs::{
    ErrCategory, LocItem, PydanticErrRep, PydanticValidationErr, count_pydantic_validation_errs,
    errs_diff_markdown, errs_diff_sections, parse_pydantic_errs,
};
