use crate::reporter::GenerationStats;
use crate::schedule::SignalTiming;
use crate::tour::Point;
use plotters::prelude::*;
use plotters::style::full_palette::{GREEN_600, GREY, ORANGE};
use std::error::Error;
use std::ops::Range;

fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if !min.is_finite() {
        return 0.0..1.0;
    }

    let pad = ((max - min) * 0.05).max(0.5);
    (min - pad)..(max + pad)
}

/// Draws the closed route through `cities` in the order given by `route`.
pub fn visualize_tour(cities: &[Point], route: &[usize], output_path: &str) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(output_path, (1000, 1000)).into_drawing_area();
    root.fill(&WHITE)?;

    let x_range = padded_range(cities.iter().map(|&(x, _)| x));
    let y_range = padded_range(cities.iter().map(|&(_, y)| y));

    let mut chart = ChartBuilder::on(&root)
        .caption("Best Tour", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_cartesian_2d(x_range, y_range)?;

    chart.configure_mesh().x_desc("x").y_desc("y").draw()?;

    // Close the loop back to the first city
    let path: Vec<Point> = route
        .iter()
        .chain(route.first())
        .map(|&city| cities[city])
        .collect();
    chart.draw_series(LineSeries::new(path, &BLUE))?;

    chart.draw_series(
        cities
            .iter()
            .map(|&point| Circle::new(point, 5, RED.filled())),
    )?;
    chart.draw_series(cities.iter().enumerate().map(|(index, &point)| {
        Text::new(format!("{}", index), point, ("sans-serif", 16).into_font())
    }))?;

    root.present()?;
    tracing::info!(output_path, "Tour chart saved");
    Ok(())
}

/// Draws one bar per intersection split into its green, yellow and red phases.
pub fn visualize_schedule(schedule: &[SignalTiming], output_path: &str) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(output_path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_cycle = schedule
        .iter()
        .map(SignalTiming::cycle_length)
        .max()
        .unwrap_or(0);
    let intersections = schedule.len() as u32;

    let mut chart = ChartBuilder::on(&root)
        .caption("Signal Schedule", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_cartesian_2d(0..max_cycle + 1, 0..intersections.max(1))?;

    chart
        .configure_mesh()
        .x_desc("Seconds")
        .y_desc("Intersection")
        .y_labels(intersections.max(1) as usize)
        .x_labels(10)
        .draw()?;

    for (index, timing) in schedule.iter().enumerate() {
        let row = index as u32;
        let yellow_start = timing.green;
        let red_start = timing.green + timing.yellow;

        chart.draw_series(vec![
            Rectangle::new([(0, row), (yellow_start, row + 1)], GREEN_600.filled()),
            Rectangle::new([(yellow_start, row), (red_start, row + 1)], ORANGE.filled()),
            Rectangle::new([(red_start, row), (timing.cycle_length(), row + 1)], RED.filled()),
            Rectangle::new([(0, row), (timing.cycle_length(), row + 1)], GREY.stroke_width(1)),
        ])?;
    }

    root.present()?;
    tracing::info!(output_path, "Schedule chart saved");
    Ok(())
}

/// Plots best and mean fitness per generation.
pub fn visualize_history(history: &[GenerationStats], output_path: &str) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(output_path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let y_range = padded_range(history.iter().flat_map(|stats| [stats.best, stats.mean]));

    let mut chart = ChartBuilder::on(&root)
        .caption("Fitness History", ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0..history.len().max(1), y_range)?;

    chart
        .configure_mesh()
        .x_desc("Generation")
        .y_desc("Fitness")
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            history
                .iter()
                .filter(|stats| stats.best.is_finite())
                .map(|stats| (stats.generation, stats.best)),
            &BLUE,
        ))?
        .label("best")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    chart
        .draw_series(LineSeries::new(
            history
                .iter()
                .filter(|stats| stats.mean.is_finite())
                .map(|stats| (stats.generation, stats.mean)),
            &GREY,
        ))?
        .label("mean")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], GREY));

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()?;

    root.present()?;
    tracing::info!(output_path, "History chart saved");
    Ok(())
}
