pub use spring_mass_lib::*;

#[cfg(feature = "report")]
pub use spring_mass_report as report;
