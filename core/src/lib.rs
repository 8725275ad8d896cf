pub mod agent_provisioner;
pub mod batch_writer;
pub mod change_evaluator;
pub mod config;
pub mod dispatcher;
pub mod entity_factory;
pub mod error;
pub mod generator;
pub mod identity;
pub mod model;
pub mod monitor;
pub mod name_generator;
pub mod report;
pub mod revenue_reader;
pub mod rng;
pub mod settings;
pub mod store;
pub mod summarizer;
pub mod types;
