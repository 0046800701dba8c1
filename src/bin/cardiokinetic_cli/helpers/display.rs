// ABOUTME: Output formatting helpers for cardiokinetic-cli
// ABOUTME: Renders weekly distributions, overall statistics, phase analyses and adjustments as text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 CardioKinetic Contributors

use cardiokinetic::intelligence::{SimulationReport, WeekAnalysis};
use cardiokinetic::models::{AdaptiveAdjustment, ResolvedProgram, WeekPlan};

/// Display weekly fatigue and readiness distributions and program-wide statistics
pub fn display_report(program: &ResolvedProgram, report: &SimulationReport) {
    println!(
        "\nProgram '{}' at {:.0} W: {} runs ({})",
        report.template_id, report.base_power, report.runs, report.randomness
    );
    println!("{}", "=".repeat(104));
    println!(
        "{:>4}  {:<14} {:>6} {:>5}  {:>7} {:>9} {:>14}  {:>7} {:>9} {:>14}",
        "Week",
        "Phase",
        "Power",
        "RPE",
        "F mean",
        "F range",
        "F P15/50/85",
        "R mean",
        "R range",
        "R P15/50/85"
    );
    println!("{}", "-".repeat(104));

    for (plan, week) in program.weeks.iter().zip(&report.weeks) {
        let fatigue = week.table.fatigue();
        let readiness = week.table.readiness();
        let summary = &week.summary;
        println!(
            "{:>4}  {:<14} {:>5.0}% {:>5.1}  {:>7.1} {:>9} {:>14}  {:>7.1} {:>9} {:>14}",
            plan.week_number,
            truncate(&plan.phase_name, 14),
            plan.power_multiplier * 100.0,
            plan.target_rpe,
            summary.fatigue.mean,
            format!("({}-{})", summary.fatigue.min, summary.fatigue.max),
            format!(
                "{}/{:.0}/{}",
                fatigue.p15(),
                summary.fatigue.p50,
                fatigue.p85()
            ),
            summary.readiness.mean,
            format!("({}-{})", summary.readiness.min, summary.readiness.max),
            format!(
                "{}/{:.0}/{}",
                readiness.p15(),
                summary.readiness.p50,
                readiness.p85()
            ),
        );
    }

    if let Some(overall) = report.overall() {
        println!("{}", "-".repeat(104));
        println!("OVERALL STATISTICS");
        println!("   Average fatigue:   {:.1}", overall.average_fatigue);
        println!(
            "   Peak fatigue:      {} (week {})",
            overall.peak_fatigue, overall.peak_fatigue_week
        );
        println!("   Average readiness: {:.1}", overall.average_readiness);
        println!(
            "   Lowest readiness:  {} (week {})",
            overall.lowest_readiness, overall.lowest_readiness_week
        );
    }
    println!("{}", "=".repeat(104));
}

/// Display per-week phase analyses
pub fn display_analyses(program: &ResolvedProgram, analyses: &[WeekAnalysis]) {
    println!("\nPhase analysis for '{}'", program.template_id);
    println!("{}", "=".repeat(88));
    println!(
        "{:>4}  {:<18} {:>7} {:>8} {:>9}  {:<11} {:>5}  {:<6} {}",
        "Week", "Label", "Median", "Smooth", "Velocity", "Phase", "Cycle", "Pos", "Markers"
    );
    println!("{}", "-".repeat(88));

    for (plan, analysis) in program.weeks.iter().zip(analyses) {
        let mut markers = Vec::new();
        if analysis.is_local_peak {
            markers.push("peak");
        }
        if analysis.is_local_trough {
            markers.push("trough");
        }
        if analysis.is_change_point {
            markers.push("shift");
        }
        println!(
            "{:>4}  {:<18} {:>7.1} {:>8.1} {:>+9.2}  {:<11} {:>5}  {:<6} {}",
            analysis.week_number,
            truncate(&plan.phase_name, 18),
            analysis.fatigue_median,
            analysis.smoothed_median,
            analysis.velocity,
            analysis.phase.name(),
            analysis.cycle_index,
            format!("{:.2}", analysis.position.ratio),
            markers.join(","),
        );
    }
    println!("{}", "=".repeat(88));
}

/// Display an adjustment decision against the planned session
pub fn display_adjustment(week: &WeekPlan, base_power: f64, decision: &AdaptiveAdjustment) {
    let planned_power = week.target_power(base_power);
    println!("\nWeek {} ({})", week.week_number, week.phase_name);
    println!("{}", "=".repeat(60));
    println!("   State: {}", decision.state.name());
    if let Some(band) = decision.state.band() {
        println!("   Band: {band:?}");
    }
    println!(
        "   Power: {planned_power:.0} W -> {:.0} W (x{:.2})",
        decision.adjusted_power(planned_power),
        decision.power_multiplier
    );
    println!(
        "   Duration: {:.1} min -> {:.1} min",
        week.duration_minutes,
        decision.adjusted_duration(week.duration_minutes)
    );
    if decision.active {
        println!("\n{}", decision.message);
    } else {
        println!("\nNo change: session runs as planned.");
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_owned()
    } else {
        let kept: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{kept}~")
    }
}
