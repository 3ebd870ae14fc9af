use crate::write_json;
use log::info;
use mdp_data::sst::{build_cells, readings_from_json, SstCell, SstMapConfig};

/// Grid the readings in `input` and print one line per cell.
pub fn run_sst(input: &str, json: Option<&str>) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(input)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", input, e))?;
    let readings = readings_from_json(&text)?;
    let config = SstMapConfig::default();
    let cells = build_cells(&readings, &config);
    info!("Built {} cells from {} readings", cells.len(), readings.len());

    let [lat, lon] = config.center();
    println!("{} cells, map centred on {:.2}, {:.2}", cells.len(), lat, lon);
    for cell in &cells {
        println!("{}", describe(cell));
    }

    if let Some(path) = json {
        write_json(path, &cells)?;
    }
    Ok(())
}

fn describe(cell: &SstCell) -> String {
    let [[south, west], [north, east]] = cell.bounds;
    format!(
        "{:.3},{:.3} .. {:.3},{:.3}  {}  {}",
        south, west, north, east, cell.color, cell.tooltip
    )
}
