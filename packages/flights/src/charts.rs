//! Chart presets for itinerary tables.

use travel_scrape_table::chart::{
    ChartError, ChartSink, ChartStyle, ComparisonChart, Figure, Orientation, comparison_chart,
};
use travel_scrape_table_models::Table;

use crate::{FLIGHT_NAME, PRICE, TOTAL_DURATION};

const ROUTE_AXIS: &str = "Vuelo (Ruta)";
const PRICE_AXIS: &str = "Precio (€)";

/// Horizontal bars of price per itinerary.
///
/// # Errors
///
/// Returns [`ChartError`] if `table` is not an itinerary table.
pub fn price_comparison(table: &Table, city: &str) -> Result<ComparisonChart, ChartError> {
    let style = ChartStyle::new(
        &format!("Comparacion Precios Vuelos {city}"),
        ROUTE_AXIS,
        PRICE_AXIS,
        Orientation::Horizontal,
        "blue",
    );
    comparison_chart(table, FLIGHT_NAME, PRICE, style)
}

/// Horizontal bars of total duration per itinerary.
///
/// # Errors
///
/// Returns [`ChartError`] if `table` is not an itinerary table.
pub fn duration_comparison(table: &Table, city: &str) -> Result<ComparisonChart, ChartError> {
    let style = ChartStyle::new(
        &format!("Comparacion Duracion Vuelos {city}"),
        ROUTE_AXIS,
        "Duracion Total (mins)",
        Orientation::Horizontal,
        "green",
    );
    comparison_chart(table, FLIGHT_NAME, TOTAL_DURATION, style)
}

/// Duration and price side by side, as vertical bars.
///
/// # Errors
///
/// Returns [`ChartError`] if `table` is not an itinerary table.
pub fn side_by_side(table: &Table, city: &str) -> Result<Figure, ChartError> {
    let duration = comparison_chart(
        table,
        FLIGHT_NAME,
        TOTAL_DURATION,
        ChartStyle::new(
            &format!("Duración Total Vuelos {city}"),
            "Vuelos (Ruta)",
            "Duración Total (minutos)",
            Orientation::Vertical,
            "orange",
        ),
    )?;
    let price = comparison_chart(
        table,
        FLIGHT_NAME,
        PRICE,
        ChartStyle::new(
            &format!("Precio Vuelos {city}"),
            "Vuelos (Ruta)",
            PRICE_AXIS,
            Orientation::Vertical,
            "purple",
        ),
    )?;
    Ok(Figure {
        panels: vec![duration, price],
    })
}

/// Sends all three presets for `city` to `sink`.
///
/// # Errors
///
/// Returns the first [`ChartError`] from building or emitting a figure.
pub fn render_all(table: &Table, city: &str, sink: &mut dyn ChartSink) -> Result<(), ChartError> {
    sink.render(&price_comparison(table, city)?.into())?;
    sink.render(&duration_comparison(table, city)?.into())?;
    sink.render(&side_by_side(table, city)?)?;
    log::debug!("Rendered flight charts for {city}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use travel_scrape_table::chart::JsonChartSink;

    use super::*;
    use crate::itineraries_table;

    const RESPONSE: &str = include_str!("../fixtures/search_response.json");

    #[test]
    fn price_bars_follow_row_order() {
        let table = itineraries_table(RESPONSE).unwrap();
        let chart = price_comparison(&table, "Sevilla").unwrap();
        assert_eq!(chart.style.title, "Comparacion Precios Vuelos Sevilla");
        assert_eq!(chart.style.color, "blue");
        let values: Vec<_> = chart.bars.iter().map(|b| b.value).collect();
        assert_eq!(values, [87.5, 112.0, 64.99]);
        assert!(chart.bars[0].label.starts_with("0 Madrid Barajas"));
    }

    #[test]
    fn duration_bars_use_total_duration() {
        let table = itineraries_table(RESPONSE).unwrap();
        let chart = duration_comparison(&table, "Sevilla").unwrap();
        let values: Vec<_> = chart.bars.iter().map(|b| b.value).collect();
        assert_eq!(values, [165.0, 175.0, 300.0]);
        assert_eq!(chart.style.orientation, Orientation::Horizontal);
    }

    #[test]
    fn side_by_side_has_two_vertical_panels() {
        let table = itineraries_table(RESPONSE).unwrap();
        let figure = side_by_side(&table, "Sevilla").unwrap();
        assert_eq!(figure.panels.len(), 2);
        assert!(figure
            .panels
            .iter()
            .all(|p| p.style.orientation == Orientation::Vertical));
        assert_eq!(figure.panels[0].style.color, "orange");
        assert_eq!(figure.panels[1].style.color, "purple");
    }

    #[test]
    fn renders_three_figures_as_json_lines() {
        let table = itineraries_table(RESPONSE).unwrap();
        let mut sink = JsonChartSink::new(Vec::new());
        render_all(&table, "Sevilla", &mut sink).unwrap();
        let output = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 3);

        let figure: serde_json::Value = serde_json::from_str(lines[2]).unwrap();
        assert_eq!(figure["panels"].as_array().unwrap().len(), 2);
        assert_eq!(figure["panels"][1]["orientation"], "vertical");
    }
}
