// Paginates a rasterized page bitmap into an A4 portrait PDF.
//
// Each frame is a full-width slice of the bitmap whose height matches one A4
// page at the bitmap's own width; the last frame may be shorter and is drawn
// at its proportional height.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{imageops, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use crate::export::ExportError;

/// A4 portrait in PDF points.
pub const A4_WIDTH_PT: f32 = 595.28;
pub const A4_HEIGHT_PT: f32 = 841.89;

/// Height in pixels of one A4 page for a bitmap `width` pixels wide.
pub fn page_height_px(width: u32) -> u32 {
    ((width as f64) * 297.0 / 210.0).round().max(1.0) as u32
}

/// `(top, height)` of each page-sized slice of a bitmap.
pub fn page_slices(width: u32, height: u32) -> Vec<(u32, u32)> {
    let page = page_height_px(width);
    let mut slices = Vec::new();
    let mut top = 0;
    while top < height {
        let h = page.min(height - top);
        slices.push((top, h));
        top += h;
    }
    slices
}

fn encode_jpeg(frame: &RgbImage, quality: u8) -> Result<Vec<u8>, ExportError> {
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality).encode_image(frame)?;
    Ok(buf)
}

fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    frame: &RgbImage,
    page_px: u32,
    quality: u8,
) -> Result<ObjectId, ExportError> {
    let jpeg = encode_jpeg(frame, quality)?;
    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => frame.width() as i64,
            "Height" => frame.height() as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        },
        jpeg,
    ));

    let drawn_height = A4_HEIGHT_PT * frame.height() as f32 / page_px as f32;
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    A4_WIDTH_PT.into(),
                    0.into(),
                    0.into(),
                    drawn_height.into(),
                    0.into(),
                    (A4_HEIGHT_PT - drawn_height).into(),
                ],
            ),
            Operation::new("Do", vec!["Im0".into()]),
            Operation::new("Q", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    Ok(doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), A4_WIDTH_PT.into(), A4_HEIGHT_PT.into()],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! { "Im0" => image_id },
        },
    }))
}

/// Builds a PDF with one A4 page per slice of `bitmap`.
pub fn paginate_to_pdf(bitmap: &RgbImage, quality: u8) -> Result<Vec<u8>, ExportError> {
    if bitmap.width() == 0 || bitmap.height() == 0 {
        return Err(ExportError::Rasterize("empty bitmap".into()));
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let page_px = page_height_px(bitmap.width());

    let mut kids: Vec<Object> = Vec::new();
    for (top, height) in page_slices(bitmap.width(), bitmap.height()) {
        let frame = imageops::crop_imm(bitmap, 0, top, bitmap.width(), height).to_image();
        let page_id = add_page(&mut doc, pages_id, &frame, page_px, quality)?;
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Cursor::new(Vec::new());
    doc.save_to(&mut out)?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_page_height_follows_a4_ratio() {
        assert_eq!(page_height_px(210), 297);
        assert_eq!(page_height_px(100), 141);
    }

    #[test]
    fn test_slices_cover_bitmap_exactly() {
        let slices = page_slices(100, 300);
        assert_eq!(slices, vec![(0, 141), (141, 141), (282, 18)]);
        assert_eq!(page_slices(210, 297), vec![(0, 297)]);
    }

    #[test]
    fn test_tall_bitmap_becomes_three_pages() {
        let bitmap = RgbImage::from_pixel(100, 300, Rgb([255, 255, 255]));
        let bytes = paginate_to_pdf(&bitmap, 90).unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn test_empty_bitmap_is_rejected() {
        let bitmap = RgbImage::new(0, 0);
        assert!(paginate_to_pdf(&bitmap, 90).is_err());
    }
}
