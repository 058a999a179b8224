use indicatif::FormattedDuration;
use std::time::{Duration, Instant};

pub fn format_hms(elapsed: Duration) -> String {
    FormattedDuration(elapsed).to_string()
}

pub fn print_hms(start: &Instant) {
    println!("Elapsed time: {}", format_hms(start.elapsed()));
}
