//! Dataload (ETL) part of the platform API

pub mod processes;
