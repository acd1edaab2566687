use super::layout::{Color, DrawCommand, PageLayout, ReportLayout};
use super::text::{latin1_bytes, FontFace};
use super::{RenderBackend, RenderError};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};

const LOGO_RESOURCE: &str = "Im1";

/// Writes layouts as PDF 1.5 using the standard Helvetica faces.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfBackend;

impl RenderBackend for PdfBackend {
    fn render(&self, layout: &ReportLayout) -> Result<Vec<u8>, RenderError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = Dictionary::new();
        for face in [FontFace::Regular, FontFace::Bold] {
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => face.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(face.resource_name(), font_id);
        }

        let mut xobjects = Dictionary::new();
        if let Some(logo) = &layout.logo {
            let image = Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => i64::from(logo.width()),
                    "Height" => i64::from(logo.height()),
                    "ColorSpace" => "DeviceRGB",
                    "BitsPerComponent" => 8,
                },
                logo.rgb().to_vec(),
            );
            xobjects.set(LOGO_RESOURCE, doc.add_object(image));
        }

        let resources_id = doc.add_object(dictionary! {
            "Font" => fonts,
            "XObject" => xobjects,
        });

        let mut kids: Vec<Object> = Vec::with_capacity(layout.pages.len());
        for page in &layout.pages {
            let content = page_content(page, layout.height);
            let encoded = content
                .encode()
                .map_err(|err| RenderError::Encode(err.to_string()))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![
                    0.into(),
                    0.into(),
                    layout.width.into(),
                    layout.height.into(),
                ],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|err| RenderError::Encode(err.to_string()))?;
        Ok(bytes)
    }
}

fn page_content(page: &PageLayout, height: f32) -> Content {
    let mut operations = Vec::new();

    for command in &page.commands {
        match command {
            DrawCommand::Rect {
                x,
                y,
                width,
                height: rect_height,
                color,
            } => {
                operations.push(fill_color(*color));
                operations.push(Operation::new(
                    "re",
                    vec![
                        (*x).into(),
                        (height - y - rect_height).into(),
                        (*width).into(),
                        (*rect_height).into(),
                    ],
                ));
                operations.push(Operation::new("f", vec![]));
            }
            DrawCommand::Line {
                x1,
                y1,
                x2,
                y2,
                thickness,
                color,
            } => {
                operations.push(stroke_color(*color));
                operations.push(Operation::new("w", vec![(*thickness).into()]));
                operations.push(Operation::new("m", vec![(*x1).into(), (height - y1).into()]));
                operations.push(Operation::new("l", vec![(*x2).into(), (height - y2).into()]));
                operations.push(Operation::new("S", vec![]));
            }
            DrawCommand::Image {
                x,
                y,
                width,
                height: image_height,
            } => {
                operations.push(Operation::new("q", vec![]));
                operations.push(Operation::new(
                    "cm",
                    vec![
                        (*width).into(),
                        0.into(),
                        0.into(),
                        (*image_height).into(),
                        (*x).into(),
                        (height - y - image_height).into(),
                    ],
                ));
                operations.push(Operation::new("Do", vec![LOGO_RESOURCE.into()]));
                operations.push(Operation::new("Q", vec![]));
            }
            DrawCommand::Text {
                x,
                y,
                size,
                font,
                color,
                text,
            } => {
                operations.push(Operation::new("BT", vec![]));
                operations.push(Operation::new(
                    "Tf",
                    vec![font.resource_name().into(), (*size).into()],
                ));
                operations.push(fill_color(*color));
                operations.push(Operation::new("Td", vec![(*x).into(), (height - y).into()]));
                operations.push(Operation::new(
                    "Tj",
                    vec![Object::String(
                        latin1_bytes(text),
                        StringFormat::Hexadecimal,
                    )],
                ));
                operations.push(Operation::new("ET", vec![]));
            }
        }
    }

    Content { operations }
}

fn components(color: Color) -> Vec<Object> {
    [color.r, color.g, color.b]
        .into_iter()
        .map(|channel| Object::Real(f32::from(channel) / 255.0))
        .collect()
}

fn fill_color(color: Color) -> Operation {
    Operation::new("rg", components(color))
}

fn stroke_color(color: Color) -> Operation {
    Operation::new("RG", components(color))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::readiness::report::layout::A4_HEIGHT;

    #[test]
    fn flips_text_baseline_into_pdf_space() {
        let page = PageLayout {
            commands: vec![DrawCommand::Text {
                x: 40.0,
                y: 100.0,
                size: 10.0,
                font: FontFace::Bold,
                color: Color::BRAND,
                text: "Total".into(),
            }],
        };

        let content = page_content(&page, A4_HEIGHT);
        let td = content
            .operations
            .iter()
            .find(|op| op.operator == "Td")
            .expect("Td operation");
        assert_eq!(td.operands[1].as_float().expect("real"), A4_HEIGHT - 100.0);

        let tf = content
            .operations
            .iter()
            .find(|op| op.operator == "Tf")
            .expect("Tf operation");
        assert_eq!(tf.operands[0].as_name().expect("name"), b"F2");
    }

    #[test]
    fn rectangles_are_anchored_by_their_top_edge() {
        let page = PageLayout {
            commands: vec![DrawCommand::Rect {
                x: 0.0,
                y: 0.0,
                width: 100.0,
                height: 80.0,
                color: Color::BRAND,
            }],
        };

        let content = page_content(&page, A4_HEIGHT);
        let re = content
            .operations
            .iter()
            .find(|op| op.operator == "re")
            .expect("re operation");
        assert_eq!(re.operands[1].as_float().expect("real"), A4_HEIGHT - 80.0);
    }
}
