mod capture;
mod ocr;

pub use capture::{XcapCapture, primary_screen_size};
pub use ocr::TesseractRecognizer;
