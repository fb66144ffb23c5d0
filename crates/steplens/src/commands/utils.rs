use crate::table::Column;
use crate::utils::config::{DEFAULT_ORIGIN_ROW, DEFAULT_TIMESTAMP_FORMATS, SCHEMA_VERSION};

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Steplens Timing Table Schema");
    println!("Report Version: {}", SCHEMA_VERSION);
    println!();

    println!("Columns:");
    for column in Column::ALL {
        let origin = if column.is_base() { "base" } else { "derived" };
        println!(
            "  {:<20} {:<10} {:<8} - {}",
            column.name(),
            column.kind().to_string(),
            origin,
            column.description()
        );
    }
    println!();

    if show_details {
        println!("Input Format:");
        println!("  <uuid> [anything]     - Batch header; starts a new batch");
        println!("  start,end,step        - One timed step");
        println!("  (blank)               - Ignored");
        println!();
        println!("Timestamp Formats (tried in order):");
        for format in DEFAULT_TIMESTAMP_FORMATS {
            println!("  {}", format);
        }
        println!();
        println!("Origin Row: {} (0-based, configurable)", DEFAULT_ORIGIN_ROW);
    } else {
        println!("Use --show for input format details");
    }
}

/// Display version information
pub fn display_version() {
    println!("Steplens v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Step timing analysis for batch-processing logs.");
}
