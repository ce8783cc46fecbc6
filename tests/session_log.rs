use pixo::{log_err, log_info, log_warn};

#[test]
fn log_macros_are_usable_in_expression_position() {
    // The macros must expand to a block expression so they can sit in match
    // arms and if/else branches, not just as statements. Without an
    // initialised logger the writes are silently dropped.
    for n in 0..3 {
        match n {
            0 => log_info!("count {}", n),
            1 => log_warn!("count {}", n),
            _ => log_err!("count {}", n),
        }
    }
    let _unit: () = if true { log_info!("branch") } else { log_warn!("branch") };
}

#[test]
fn write_line_without_init_is_a_no_op() {
    pixo::logger::write_line("dropped");
    pixo::logger::write("INFO", "dropped");
}
