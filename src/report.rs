/// Plain-text report tables
use crate::leaderboard::LeaderboardEntry;
use crate::verdict::scorer::GradeReport;
use std::fmt::Write;

/// Render rows under `headers`, each column padded to its widest cell.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    out.push_str(format_row(headers.iter().copied(), &widths).trim_end());
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|&w| "-".repeat(w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    out.push('\n');
    for row in rows {
        out.push_str(format_row(row.iter().map(String::as_str), &widths).trim_end());
        out.push('\n');
    }
    out
}

fn format_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:<w$}"))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn show_answer(got: Option<i64>) -> String {
    got.map_or_else(|| "None".to_string(), |v| v.to_string())
}

fn show_perf_ms(perf_ms: Option<u64>) -> String {
    perf_ms.map_or_else(|| "-".to_string(), |ms| format!("{ms} ms"))
}

/// Full report for one grading run
pub fn render_grade_report(report: &GradeReport, participant: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n=== WordMaze Grader Report ===");
    let _ = writeln!(out, "Solver cmd : {}", report.command);
    let _ = writeln!(out, "Participant: {participant}");
    let _ = writeln!(out, "Run id     : {}", report.run_id);

    let _ = writeln!(out, "\nCorrectness results:");
    let rows: Vec<Vec<String>> = report
        .cases
        .iter()
        .map(|c| {
            vec![
                c.name.clone(),
                if c.verdict.passed() { "OK".to_string() } else { format!("FAIL ({})", c.verdict) },
                c.expected.to_string(),
                show_answer(c.got),
                c.elapsed_ms.to_string(),
                format!("{}/{}", c.points_awarded, c.points_possible),
            ]
        })
        .collect();
    out.push_str(&render_table(
        &["Test", "Result", "Expected", "Got", "Time(ms)", "Points"],
        &rows,
    ));
    for case in report.cases.iter().filter(|c| !c.stderr_excerpt.is_empty()) {
        let _ = writeln!(out, "  [{}] stderr: {}", case.name, case.stderr_excerpt);
    }
    let _ = writeln!(
        out,
        "\nCorrectness points: {}/{}",
        report.correctness, report.max_correctness
    );

    let _ = writeln!(out, "\nPerformance result:");
    let perf = &report.perf;
    out.push_str(&render_table(
        &["N", "Result", "Expected", "Got", "Time(ms)", "Perf points"],
        &[vec![
            perf.n.to_string(),
            perf.verdict.to_string(),
            perf.expected.to_string(),
            show_answer(perf.got),
            perf.elapsed_ms.to_string(),
            perf.points.to_string(),
        ]],
    ));
    let _ = writeln!(out, "\nTOTAL SCORE: {}/100", report.total_score);
    out
}

/// Ranking table; `limit` caps the number of rows.
pub fn render_leaderboard(entries: &[LeaderboardEntry], limit: Option<usize>, include_cmd: bool) -> String {
    if entries.is_empty() {
        return "No leaderboard entries yet.\n".to_string();
    }
    let shown = limit.unwrap_or(entries.len()).min(entries.len());
    let rows: Vec<Vec<String>> = entries[..shown]
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut row = vec![
                (i + 1).to_string(),
                e.name.clone(),
                e.total_score.to_string(),
                e.correctness.to_string(),
                e.perf_score.to_string(),
                show_perf_ms(e.perf_ms),
            ];
            if include_cmd {
                row.push(e.cmd.clone());
            }
            row
        })
        .collect();

    let mut headers = vec!["#", "Name", "Total", "Correct", "Perf", "Perf(ms)"];
    if include_cmd {
        headers.push("Cmd");
    }
    render_table(&headers, &rows)
}
