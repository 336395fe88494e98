use std::path::Path;

use console::Style;
use phasestitch_core::config::GridLayout;
use phasestitch_core::score::CrossCorrelationResult;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    accepted: Style,
    rejected: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            accepted: Style::new().green().bold(),
            rejected: Style::new().red().bold(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_registration_summary(
    a: &Path,
    b: &Path,
    layout: &GridLayout,
    results: &[CrossCorrelationResult<2>],
) {
    let s = Styles::new();
    let reg = &layout.registration;

    println!();
    println!("  {}", s.title.apply_to("Tile Registration"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(17)));
    println!();

    println!("  {:<14}{}", s.label.apply_to("Reference"), s.path.apply_to(a.display()));
    println!("  {:<14}{}", s.label.apply_to("Moving"), s.path.apply_to(b.display()));
    println!(
        "  {:<14}{}",
        s.label.apply_to("Peaks"),
        s.value.apply_to(reg.check_peaks)
    );
    if reg.windowing {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Window"),
            s.value.apply_to("mirror + exponential")
        );
    } else {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Window"),
            s.disabled.apply_to("disabled")
        );
    }
    println!();

    if results.is_empty() {
        println!(
            "  {}",
            s.rejected.apply_to("No candidate shifts (blank or constant tile)")
        );
        println!();
        return;
    }

    println!("  {}", s.header.apply_to("Candidates"));
    println!(
        "    {:<6}{:>14}{:>10}{:>12}{:>14}{:>10}",
        s.label.apply_to("#"),
        s.label.apply_to("shift"),
        s.label.apply_to("R"),
        s.label.apply_to("overlap"),
        s.label.apply_to("SSQ"),
        s.label.apply_to("PCM")
    );
    for (i, result) in results.iter().enumerate() {
        let ssq = if result.ssq == f64::MAX {
            "-".to_string()
        } else {
            format!("{:.2}", result.ssq)
        };
        println!(
            "    {:<6}{:>14}{:>10.4}{:>12}{:>14}{:>10.4}",
            i + 1,
            format!("({}, {})", result.shift[0], result.shift[1]),
            result.r,
            result.overlapping_pixels,
            ssq,
            result.pcm_value
        );
    }
    println!();

    let best = &results[0];
    let verdict = if layout.accepts(best) {
        s.accepted.apply_to("accepted")
    } else {
        s.rejected.apply_to("rejected")
    };
    println!(
        "  {:<14}{} {}",
        s.label.apply_to("Translation"),
        s.value
            .apply_to(format!("({}, {})", best.shift[0], best.shift[1])),
        verdict
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Threshold R"),
        s.value.apply_to(layout.threshold_r)
    );
    println!();
}
