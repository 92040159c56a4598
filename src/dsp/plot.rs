use std::io::Cursor;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use plotters::prelude::LineSeries;
use plotters::prelude::*;
use crate::config::TOTAL_POWER_RANGE_HZ;
use crate::dsp::error::SignalError;
use crate::dsp::spectrum::Spectrum;
use crate::types::Band;
#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    pub line: RGBColor,
    /// One shade per band, in `Band::ALL` order.
    pub band_palette: [RGBColor; 5],
}
impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 900,
            height: 400,
            background: RGBColor(10, 10, 10),
            line: WHITE,
            band_palette: [BLUE, GREEN, YELLOW, MAGENTA, RED],
        }
    }
}
/// Draws the power spectrum up to the top of the normalisation window with
/// each band's range shaded behind the trace.
pub fn render_spectrum_png(spectrum: &Spectrum, style: &PlotStyle) -> Result<Vec<u8>, SignalError> {
    if spectrum.power.is_empty() {
        return Err(SignalError::Plot("spectrum has no bins".into()));
    }
    let x_max = TOTAL_POWER_RANGE_HZ.1;
    let y_max = spectrum
        .bins()
        .filter(|(freq, _)| *freq < x_max)
        .fold(0.0f64, |acc, (_, p)| acc.max(p))
        .max(1e-6);
    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .build_cartesian_2d(0f64..x_max, 0f64..y_max * 1.05)?;
        chart.draw_series(Band::ALL.iter().map(|band| {
            let (lo, hi) = band.range_hz();
            let color = style.band_palette[band.index()];
            Rectangle::new([(lo, 0.0), (hi, y_max * 1.05)], color.mix(0.15).filled())
        }))?;
        let series = spectrum.bins().filter(|(freq, _)| *freq <= x_max);
        chart.draw_series(LineSeries::new(series, &style.line))?;
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, SignalError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| SignalError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
