use dic_solver::config::analysis;
use dic_solver::image::io::{load_grayscale, write_json_file};
use dic_solver::image::to_f32;
use dic_solver::types::{Point, SolveResult};
use dic_solver::DicSolver;
use serde::Serialize;
use std::env;
use std::path::Path;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = analysis::load_config(Path::new(&config_path))?;
    if config.points.is_empty() {
        return Err("config lists no analysis points".to_string());
    }

    let gray_ref = load_grayscale(&config.reference_image)?;
    let gray_def = load_grayscale(&config.deformed_image)?;
    let image_ref = to_f32(&gray_ref.as_view());
    let image_def = to_f32(&gray_def.as_view());

    let solver = DicSolver::new(config.solver.clone())?;
    let centers: Vec<Point> = config.points.iter().map(|p| Point::new(p[0], p[1])).collect();
    let results = solver.solve_points(&image_ref, &image_def, &centers);

    let mut report = Vec::with_capacity(results.len());
    for (point, result) in config.points.iter().zip(&results) {
        println!("\nAnalysis point ({:.1}, {:.1})", point[0], point[1]);
        print_field_summary(result);
        report.push(PointReport {
            center: *point,
            result: *result,
        });
    }

    if let Some(path) = &config.output.json_out {
        write_json_file(path, &report)?;
        println!("\nJSON report written to {}", path.display());
    }

    Ok(())
}

fn print_field_summary(result: &SolveResult) {
    let f = &result.field;
    println!("Correlation - displacement field found:");
    println!("  Translation     u1 = {:.4}, u2 = {:.4}", f.u1, f.u2);
    println!(
        "  Expansion  du1/dx1 = {:.4}, du2/dx2 = {:.4}",
        f.du1dx1, f.du2dx2
    );
    println!(
        "  Shear      du1/dx2 = {:.4}, du2/dx1 = {:.4}",
        f.du1dx2, f.du2dx1
    );
    println!(
        "  best correlation = {:.4}, iterations = {}, converged = {}, latency_ms = {:.1}",
        result.best_correlation, result.iterations, result.converged, result.latency_ms
    );
}

fn usage() -> String {
    "Usage: dic_demo <config.json>".to_string()
}

#[derive(Debug, Serialize)]
struct PointReport {
    center: [f64; 2],
    result: SolveResult,
}
