use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use image::{codecs::jpeg::JpegEncoder, ColorType, RgbImage};
use lopdf::{
    content::{Content, Operation},
    dictionary, Document, Object, Stream,
};

use crate::core::{error::RenderError, image_utils::OutputFormat};

/// Quality of the JPEG stream embedded in PDF output.
pub const PDF_JPEG_QUALITY: u8 = 75;

const METERS_PER_INCH: f64 = 0.0254;
const PDF_POINTS_PER_INCH: f64 = 72.0;

/**
 * Writes the finished pixel buffer to `path` in the requested format, tagged with
 * the print resolution. The file is only created once the encoded bytes are ready,
 * so an encoding failure does not leave a truncated image behind.
 */
pub fn write_image(
    path: &Path,
    image: &RgbImage,
    dpi: u32,
    format: OutputFormat,
) -> Result<(), RenderError> {
    let bytes = match format {
        OutputFormat::Png => encode_png(image, dpi)?,
        OutputFormat::Pdf => encode_pdf(image, dpi)?,
    };
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&bytes)?;
    writer.flush()?;
    log::info!("Wrote image file to: {}", path.display());
    Ok(())
}

pub fn pixels_per_meter(dpi: u32) -> u32 {
    (dpi as f64 / METERS_PER_INCH).round() as u32
}

/// PNG with a `pHYs` chunk, so that the print size survives in the file.
pub fn encode_png(image: &RgbImage, dpi: u32) -> Result<Vec<u8>, RenderError> {
    let mut bytes = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut bytes, image.width(), image.height());
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let density = pixels_per_meter(dpi);
        encoder.set_pixel_dims(Some(png::PixelDimensions {
            xppu: density,
            yppu: density,
            unit: png::Unit::Meter,
        }));
        let mut writer = encoder.write_header()?;
        writer.write_image_data(image.as_raw())?;
        writer.finish()?;
    }
    Ok(bytes)
}

/**
 * Single-page PDF holding the image as a JPEG (DCTDecode) XObject. The page is
 * sized so that the image prints at exactly `dpi`.
 */
pub fn encode_pdf(image: &RgbImage, dpi: u32) -> Result<Vec<u8>, RenderError> {
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, PDF_JPEG_QUALITY).encode(
        image.as_raw(),
        image.width(),
        image.height(),
        ColorType::Rgb8,
    )?;

    let page_width = image.width() as f64 * PDF_POINTS_PER_INCH / dpi as f64;
    let page_height = image.height() as f64 * PDF_POINTS_PER_INCH / dpi as f64;

    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => image.width() as i64,
            "Height" => image.height() as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        },
        jpeg,
    ));

    // scale the unit square to the page, then paint the image into it
    let contents = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    page_width.into(),
                    0.into(),
                    0.into(),
                    page_height.into(),
                    0.into(),
                    0.into(),
                ],
            ),
            Operation::new("Do", vec!["image".into()]),
            Operation::new("Q", vec![]),
        ],
    };
    let contents_id = doc.add_object(Stream::new(dictionary! {}, contents.encode()?));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), page_width.into(), page_height.into()],
        "Resources" => dictionary! {
            "ProcSet" => vec!["PDF".into(), "ImageC".into()],
            "XObject" => dictionary! { "image" => image_id },
        },
        "Contents" => contents_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}
