use std::path::Path;

use riddler_core::{CaptureError, RegionCaptureProvider};
use riddler_types::{CaptureRegion, ScreenSize};
use xcap::Monitor;

/// Region capture of the primary monitor through `xcap`
#[derive(Debug, Default, Clone, Copy)]
pub struct XcapCapture;

impl XcapCapture {
    pub fn new() -> Self {
        Self
    }
}

impl RegionCaptureProvider for XcapCapture {
    fn screen_size(&self) -> Result<ScreenSize, CaptureError> {
        primary_screen_size()
    }

    fn capture_region(&self, region: CaptureRegion, target: &Path) -> Result<(), CaptureError> {
        let monitor = primary_monitor()?;
        let image = monitor
            .capture_image()
            .map_err(|e| CaptureError::Backend(format!("Failed to capture screen: {e}")))?;

        let crop = to_image_pixels(
            region,
            ScreenSize {
                width: monitor.width(),
                height: monitor.height(),
            },
            image.width(),
            image.height(),
        )?;
        if crop != region {
            tracing::debug!("Scaled region {:?} to image pixels {:?}", region, crop);
        }

        let cropped = xcap::image::imageops::crop_imm(
            &image,
            crop.x as u32,
            crop.y as u32,
            crop.width,
            crop.height,
        )
        .to_image();
        let png = encode_png(&cropped)?;
        std::fs::write(target, png)?;
        Ok(())
    }
}

/// Size of the primary monitor in the units regions are resolved in
pub fn primary_screen_size() -> Result<ScreenSize, CaptureError> {
    let monitor = primary_monitor()?;
    Ok(ScreenSize {
        width: monitor.width(),
        height: monitor.height(),
    })
}

/// Map a region in monitor units onto the captured image.
///
/// Monitor sizes may be logical points (macOS) while the image is always in
/// physical pixels, so the region is scaled by image size over monitor size.
/// A region that does not fit inside the monitor is an error, never clamped.
fn to_image_pixels(
    region: CaptureRegion,
    monitor: ScreenSize,
    image_width: u32,
    image_height: u32,
) -> Result<CaptureRegion, CaptureError> {
    let fits = region.x >= 0
        && region.y >= 0
        && u64::from(region.x as u32) + u64::from(region.width) <= u64::from(monitor.width)
        && u64::from(region.y as u32) + u64::from(region.height) <= u64::from(monitor.height);
    if !fits || monitor.width == 0 || monitor.height == 0 {
        return Err(CaptureError::Backend(format!(
            "Region {:?} does not fit the {}x{} monitor",
            region, monitor.width, monitor.height
        )));
    }

    let scale = |value: u32, pixels: u32, units: u32| {
        (u64::from(value) * u64::from(pixels) / u64::from(units)) as u32
    };
    Ok(CaptureRegion {
        x: scale(region.x as u32, image_width, monitor.width) as i32,
        y: scale(region.y as u32, image_height, monitor.height) as i32,
        width: scale(region.width, image_width, monitor.width),
        height: scale(region.height, image_height, monitor.height),
    })
}

fn primary_monitor() -> Result<Monitor, CaptureError> {
    let monitors = Monitor::all()
        .map_err(|e| CaptureError::ScreenQuery(format!("Failed to get monitors: {e}")))?;

    let position = monitors
        .iter()
        .position(|m| m.is_primary())
        .unwrap_or(0);

    monitors
        .into_iter()
        .nth(position)
        .ok_or(CaptureError::NoMonitor)
}

fn encode_png(image: &xcap::image::RgbaImage) -> Result<Vec<u8>, CaptureError> {
    use xcap::image::ImageEncoder;
    let mut buffer = Vec::new();
    xcap::image::codecs::png::PngEncoder::new(&mut buffer)
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            xcap::image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| CaptureError::Backend(format!("Failed to encode PNG: {e}")))?;
    Ok(buffer)
}
