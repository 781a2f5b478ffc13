/// Console adapters for diagnostics output
mod progress_reporter;

pub use progress_reporter::StderrProgressReporter;
