use crate::document::Document;
use crate::error::Result;
use crate::objects::{Dictionary, Object, ObjectId, Stream};
use crate::page::Page;
use crate::text::{push_literal, Font};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::io::Write;

const CATALOG_ID: u32 = 1;
const PAGES_ID: u32 = 2;
const INFO_ID: u32 = 3;
const FIRST_FONT_ID: u32 = 4;

/// Serializes a [`Document`] as a classic (xref table) PDF 1.7 file.
///
/// Object numbers are assigned sequentially in page order, so the same
/// document always produces the same bytes.
pub struct PdfWriter<W: Write> {
    writer: W,
    xref_positions: BTreeMap<ObjectId, u64>,
    current_position: u64,
}

/// Object numbers reserved for one page
struct PageIds {
    page: ObjectId,
    content: ObjectId,
    images: Vec<ObjectId>,
}

impl<W: Write> PdfWriter<W> {
    pub fn new_with_writer(writer: W) -> Self {
        Self {
            writer,
            xref_positions: BTreeMap::new(),
            current_position: 0,
        }
    }

    pub fn write_document(&mut self, document: &Document) -> Result<()> {
        self.write_header()?;

        let catalog_id = self.write_catalog()?;
        let font_ids = self.write_fonts()?;
        self.write_pages(document, &font_ids)?;
        let info_id = self.write_info(document)?;

        let xref_position = self.current_position;
        self.write_xref()?;
        self.write_trailer(catalog_id, info_id, xref_position)?;

        self.writer.flush()?;
        Ok(())
    }

    fn write_header(&mut self) -> Result<()> {
        self.write_bytes(b"%PDF-1.7\n")?;
        // Binary comment to ensure file is treated as binary
        self.write_bytes(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n'])?;
        Ok(())
    }

    fn write_catalog(&mut self) -> Result<ObjectId> {
        let catalog_id = ObjectId::new(CATALOG_ID, 0);

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::name("Catalog"));
        catalog.set("Pages", ObjectId::new(PAGES_ID, 0));

        self.write_object(catalog_id, Object::Dictionary(catalog))?;
        Ok(catalog_id)
    }

    /// One shared Type1 font object per standard font, referenced from every page
    fn write_fonts(&mut self) -> Result<Vec<(Font, ObjectId)>> {
        let mut ids = Vec::with_capacity(Font::ALL.len());
        for (offset, font) in Font::ALL.iter().enumerate() {
            let id = ObjectId::new(FIRST_FONT_ID + offset as u32, 0);

            let mut dict = Dictionary::new();
            dict.set("Type", Object::name("Font"));
            dict.set("Subtype", Object::name("Type1"));
            dict.set("BaseFont", Object::name(font.pdf_name()));
            dict.set("Encoding", Object::name("WinAnsiEncoding"));

            self.write_object(id, Object::Dictionary(dict))?;
            ids.push((*font, id));
        }
        Ok(ids)
    }

    fn write_pages(&mut self, document: &Document, font_ids: &[(Font, ObjectId)]) -> Result<()> {
        let pages_id = ObjectId::new(PAGES_ID, 0);

        let mut next_id = FIRST_FONT_ID + Font::ALL.len() as u32;
        let mut layout = Vec::with_capacity(document.pages.len());
        for page in &document.pages {
            let image_count = page.images().len() as u32;
            layout.push(PageIds {
                page: ObjectId::new(next_id, 0),
                content: ObjectId::new(next_id + 1, 0),
                images: (0..image_count)
                    .map(|i| ObjectId::new(next_id + 2 + i, 0))
                    .collect(),
            });
            next_id += 2 + image_count;
        }

        let mut pages_dict = Dictionary::new();
        pages_dict.set("Type", Object::name("Pages"));
        pages_dict.set("Count", document.pages.len() as i64);
        pages_dict.set(
            "Kids",
            layout
                .iter()
                .map(|ids| Object::Reference(ids.page))
                .collect::<Vec<_>>(),
        );
        self.write_object(pages_id, Object::Dictionary(pages_dict))?;

        for (page, ids) in document.pages.iter().zip(&layout) {
            self.write_page(pages_id, ids, page, font_ids)?;
            self.write_page_content(ids.content, page)?;
            for (image, id) in page.images().values().zip(&ids.images) {
                self.write_object(*id, image.to_pdf_object())?;
            }
        }

        Ok(())
    }

    fn write_page(
        &mut self,
        parent_id: ObjectId,
        ids: &PageIds,
        page: &Page,
        font_ids: &[(Font, ObjectId)],
    ) -> Result<()> {
        let mut page_dict = Dictionary::new();
        page_dict.set("Type", Object::name("Page"));
        page_dict.set("Parent", parent_id);
        page_dict.set(
            "MediaBox",
            vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(page.width()),
                Object::Real(page.height()),
            ],
        );
        page_dict.set("Contents", ids.content);

        let mut resources = Dictionary::new();
        let font_dict: Dictionary = font_ids
            .iter()
            .map(|(font, id)| (font.pdf_name().to_string(), Object::Reference(*id)))
            .collect();
        resources.set("Font", font_dict);

        if !page.images().is_empty() {
            let xobject_dict: Dictionary = page
                .images()
                .keys()
                .zip(&ids.images)
                .map(|(name, id)| (name.clone(), Object::Reference(*id)))
                .collect();
            resources.set("XObject", xobject_dict);
        }

        page_dict.set("Resources", resources);

        self.write_object(ids.page, Object::Dictionary(page_dict))
    }

    fn write_page_content(&mut self, content_id: ObjectId, page: &Page) -> Result<()> {
        #[allow(unused_mut)]
        let mut stream = Stream::new(page.generate_content());

        #[cfg(feature = "compression")]
        stream.compress_flate()?;

        self.write_object(content_id, stream.into_object())
    }

    fn write_info(&mut self, document: &Document) -> Result<ObjectId> {
        let info_id = ObjectId::new(INFO_ID, 0);
        let metadata = &document.metadata;
        let mut info_dict = Dictionary::new();

        let fields = [
            ("Title", &metadata.title),
            ("Author", &metadata.author),
            ("Subject", &metadata.subject),
            ("Keywords", &metadata.keywords),
            ("Creator", &metadata.creator),
            ("Producer", &metadata.producer),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                info_dict.set(key, Object::String(value.clone()));
            }
        }

        if let Some(creation_date) = metadata.creation_date {
            info_dict.set("CreationDate", Object::String(format_pdf_date(creation_date)));
        }

        self.write_object(info_id, Object::Dictionary(info_dict))?;
        Ok(info_id)
    }
}

impl<W: Write> PdfWriter<W> {
    fn write_object(&mut self, id: ObjectId, object: Object) -> Result<()> {
        self.xref_positions.insert(id, self.current_position);

        let header = format!("{} {} obj\n", id.number(), id.generation());
        self.write_bytes(header.as_bytes())?;

        self.write_object_value(&object)?;

        self.write_bytes(b"\nendobj\n")?;
        Ok(())
    }

    fn write_object_value(&mut self, object: &Object) -> Result<()> {
        match object {
            Object::Null => self.write_bytes(b"null")?,
            Object::Boolean(b) => self.write_bytes(if *b { b"true" } else { b"false" })?,
            Object::Integer(i) => self.write_bytes(i.to_string().as_bytes())?,
            Object::Real(f) => self.write_bytes(format_real(*f).as_bytes())?,
            Object::String(s) => {
                let mut literal = String::new();
                push_literal(&mut literal, s);
                self.write_bytes(literal.as_bytes())?;
            }
            Object::Name(n) => {
                self.write_bytes(b"/")?;
                self.write_bytes(n.as_bytes())?;
            }
            Object::Array(arr) => {
                self.write_bytes(b"[")?;
                for (i, obj) in arr.iter().enumerate() {
                    if i > 0 {
                        self.write_bytes(b" ")?;
                    }
                    self.write_object_value(obj)?;
                }
                self.write_bytes(b"]")?;
            }
            Object::Dictionary(dict) => self.write_dictionary(dict)?,
            Object::Stream(dict, data) => {
                self.write_dictionary(dict)?;
                self.write_bytes(b"\nstream\n")?;
                self.write_bytes(data)?;
                self.write_bytes(b"\nendstream")?;
            }
            Object::Reference(id) => self.write_bytes(id.to_string().as_bytes())?,
        }
        Ok(())
    }

    fn write_dictionary(&mut self, dict: &Dictionary) -> Result<()> {
        self.write_bytes(b"<<")?;
        for (key, value) in dict.entries() {
            self.write_bytes(b"\n/")?;
            self.write_bytes(key.as_bytes())?;
            self.write_bytes(b" ")?;
            self.write_object_value(value)?;
        }
        self.write_bytes(b"\n>>")
    }

    fn write_xref(&mut self) -> Result<()> {
        let max_obj_num = self
            .xref_positions
            .keys()
            .map(|id| id.number())
            .max()
            .unwrap_or(0);

        self.write_bytes(format!("xref\n0 {}\n", max_obj_num + 1).as_bytes())?;
        self.write_bytes(b"0000000000 65535 f \n")?;

        let mut offsets = vec![None; max_obj_num as usize + 1];
        for (id, position) in &self.xref_positions {
            offsets[id.number() as usize] = Some(*position);
        }

        // Gaps become free entries
        for offset in offsets.into_iter().skip(1) {
            let entry = match offset {
                Some(position) => format!("{position:010} 00000 n \n"),
                None => "0000000000 00000 f \n".to_string(),
            };
            self.write_bytes(entry.as_bytes())?;
        }

        Ok(())
    }

    fn write_trailer(
        &mut self,
        catalog_id: ObjectId,
        info_id: ObjectId,
        xref_position: u64,
    ) -> Result<()> {
        let max_obj_num = self
            .xref_positions
            .keys()
            .map(|id| id.number())
            .max()
            .unwrap_or(0);

        let mut trailer = Dictionary::new();
        trailer.set("Size", (max_obj_num + 1) as i64);
        trailer.set("Root", catalog_id);
        trailer.set("Info", info_id);

        self.write_bytes(b"trailer\n")?;
        self.write_dictionary(&trailer)?;
        self.write_bytes(b"\nstartxref\n")?;
        self.write_bytes(xref_position.to_string().as_bytes())?;
        self.write_bytes(b"\n%%EOF\n")?;

        Ok(())
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.current_position += data.len() as u64;
        Ok(())
    }
}

fn format_real(value: f64) -> String {
    let formatted = format!("{value:.6}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Format a DateTime as a PDF date string (D:YYYYMMDDHHmmSSOHH'mm)
fn format_pdf_date(date: DateTime<Utc>) -> String {
    format!("{}+00'00", date.format("D:%Y%m%d%H%M%S"))
}
