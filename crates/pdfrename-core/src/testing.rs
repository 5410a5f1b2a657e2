//! In-memory PDF fixtures for unit tests.

use lopdf::content::{Content, Operation};
use lopdf::encryption;
use lopdf::{dictionary, Dictionary, Object, ObjectId, Stream, StringFormat};

use crate::pdf::encoding::win_ansi_byte;

/// Password padding from the standard security handler.
const PASSWORD_PAD: [u8; 32] = [
    0x28, 0xBF, 0x4E, 0x5E, 0x4E, 0x75, 0x8A, 0x41, 0x64, 0x00, 0x4E, 0x56, 0xFF, 0xFA, 0x01, 0x08,
    0x2E, 0x2E, 0x00, 0xB6, 0xD0, 0x68, 0x3E, 0x80, 0x2F, 0x0C, 0xA9, 0xFE, 0x64, 0x53, 0x69, 0x7A,
];

enum PageKind {
    /// Text objects, each a list of lines, set in the named font resource.
    Text { font: String, objects: Vec<Vec<String>> },
    /// A page drawn as a single form XObject holding one line of text.
    Figure(String),
}

/// Builds small single-font PDFs.
#[derive(Default)]
pub(crate) struct PdfBuilder {
    pages: Vec<PageKind>,
    info: Vec<(String, Vec<u8>)>,
    user_password: Option<String>,
}

impl PdfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page with one text object per entry of `objects`.
    pub fn text_page(self, objects: &[&[&str]]) -> Self {
        self.text_page_in_font("F1", objects)
    }

    /// Like [`text_page`](Self::text_page), selecting font resource `font`,
    /// which need not exist.
    pub fn text_page_in_font(mut self, font: &str, objects: &[&[&str]]) -> Self {
        self.pages.push(PageKind::Text {
            font: font.to_string(),
            objects: objects
                .iter()
                .map(|lines| lines.iter().map(|l| l.to_string()).collect())
                .collect(),
        });
        self
    }

    pub fn figure_page(mut self, text: &str) -> Self {
        self.pages.push(PageKind::Figure(text.to_string()));
        self
    }

    /// Set an Info dictionary entry to a string with these bytes.
    pub fn info(mut self, key: &str, value: &[u8]) -> Self {
        self.info.push((key.to_string(), value.to_vec()));
        self
    }

    /// Encrypt the output with RC4 (revision 2) under this user password.
    pub fn encrypted(mut self, user_password: &str) -> Self {
        self.user_password = Some(user_password.to_string());
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut doc = lopdf::Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for page in &self.pages {
            let page_id = match page {
                PageKind::Text { font, objects } => {
                    let content = Content {
                        operations: text_operations(font, objects, 760),
                    };
                    let content_id =
                        doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
                    doc.add_object(dictionary! {
                        "Type" => "Page",
                        "Parent" => pages_id,
                        "Contents" => content_id,
                        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
                    })
                }
                PageKind::Figure(text) => {
                    let form = Content {
                        operations: text_operations("F1", &[vec![text.clone()]], 700),
                    };
                    let form_id = doc.add_object(Stream::new(
                        dictionary! {
                            "Type" => "XObject",
                            "Subtype" => "Form",
                            "BBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
                            "Resources" => resources_id,
                        },
                        form.encode().unwrap(),
                    ));
                    let content = Content {
                        operations: vec![
                            Operation::new("q", vec![]),
                            Operation::new(
                                "cm",
                                vec![1.into(), 0.into(), 0.into(), 1.into(), 0.into(), 0.into()],
                            ),
                            Operation::new("Do", vec![Object::Name(b"Fm1".to_vec())]),
                            Operation::new("Q", vec![]),
                        ],
                    };
                    let content_id =
                        doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
                    doc.add_object(dictionary! {
                        "Type" => "Page",
                        "Parent" => pages_id,
                        "Contents" => content_id,
                        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
                        "Resources" => dictionary! {
                            "Font" => dictionary! { "F1" => font_id },
                            "XObject" => dictionary! { "Fm1" => form_id },
                        },
                    })
                }
            };
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
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut info_id = None;
        if !self.info.is_empty() {
            let mut info = Dictionary::new();
            for (key, value) in self.info {
                info.set(key.into_bytes(), Object::String(value, StringFormat::Hexadecimal));
            }
            let id: ObjectId = doc.add_object(info);
            doc.trailer.set("Info", id);
            info_id = Some(id);
        }

        if let Some(password) = &self.user_password {
            encrypt(&mut doc, password, info_id);
        }

        let mut data = Vec::new();
        doc.save_to(&mut data).unwrap();
        data
    }
}

/// Apply the standard security handler: every string and stream is sealed
/// with its per-object RC4 key, Info strings included.
fn encrypt(doc: &mut lopdf::Document, user_password: &str, info_id: Option<ObjectId>) {
    let encrypt_id = doc.add_object(dictionary! {
        "Filter" => "Standard",
        "V" => 1,
        "R" => 2,
        "Length" => 40,
        "O" => Object::String(vec![0x4F; 32], StringFormat::Hexadecimal),
        "P" => -4,
        "CF" => dictionary! { "StdCF" => dictionary! { "CFM" => "V2" } },
    });
    doc.trailer.set("Encrypt", encrypt_id);
    let file_id = Object::String(b"pdfrename-fixture".to_vec(), StringFormat::Hexadecimal);
    doc.trailer.set("ID", vec![file_id.clone(), file_id]);

    let key = encryption::get_encryption_key(doc, user_password, false).unwrap();
    let check = rc4(&key, &PASSWORD_PAD);
    doc.get_object_mut(encrypt_id)
        .and_then(Object::as_dict_mut)
        .unwrap()
        .set("U", Object::String(check, StringFormat::Hexadecimal));

    // RC4 is symmetric, so "decrypting" plaintext seals it.
    for (&id, object) in doc.objects.iter_mut() {
        if id == encrypt_id {
            continue;
        }
        if Some(id) == info_id {
            if let Object::Dictionary(info) = object {
                for (_, value) in info.iter_mut() {
                    if let Ok(sealed) = encryption::decrypt_object(&key, id, &*value, false) {
                        *value = Object::String(sealed, StringFormat::Hexadecimal);
                    }
                }
            }
            continue;
        }
        let Ok(sealed) = encryption::decrypt_object(&key, id, &*object, false) else {
            continue;
        };
        match object {
            Object::Stream(stream) => stream.set_content(sealed),
            Object::String(content, _) => *content = sealed,
            _ => {}
        }
    }
}

fn rc4(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut state: Vec<u8> = (0..=255).collect();
    let mut j = 0u8;
    for i in 0..256 {
        j = j.wrapping_add(state[i]).wrapping_add(key[i % key.len()]);
        state.swap(i, j as usize);
    }

    let (mut i, mut j) = (0u8, 0u8);
    data.iter()
        .map(|&byte| {
            i = i.wrapping_add(1);
            j = j.wrapping_add(state[i as usize]);
            state.swap(i as usize, j as usize);
            byte ^ state[state[i as usize].wrapping_add(state[j as usize]) as usize]
        })
        .collect()
}

fn text_operations(font: &str, objects: &[Vec<String>], top: i64) -> Vec<Operation> {
    let mut operations = Vec::new();
    let mut y = top;
    for lines in objects {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![Object::Name(font.as_bytes().to_vec()), 10.into()],
        ));
        operations.push(Operation::new("Td", vec![50.into(), y.into()]));
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                operations.push(Operation::new("Td", vec![0.into(), (-12).into()]));
            }
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(encode_win_ansi(line), StringFormat::Literal)],
            ));
        }
        operations.push(Operation::new("ET", vec![]));
        y -= 14 * (lines.len() as i64 + 1);
    }
    operations
}

/// Encode text for the WinAnsi Helvetica used by [`PdfBuilder`].
pub(crate) fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| win_ansi_byte(c).unwrap_or_else(|| panic!("{c:?} has no WinAnsi code")))
        .collect()
}

/// A PDF text string in UTF-16BE with byte order mark.
pub(crate) fn utf16_text(text: &str) -> Vec<u8> {
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    bytes
}
