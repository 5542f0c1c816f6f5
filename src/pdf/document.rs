use anyhow::{anyhow, Context, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::path::Path;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: &[&[u8]] = &[b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// An axis-aligned page rectangle in PDF user space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub llx: f32,
    pub lly: f32,
    pub urx: f32,
    pub ury: f32,
}

impl Rect {
    pub fn width(&self) -> f32 {
        self.urx - self.llx
    }

    pub fn height(&self) -> f32 {
        self.ury - self.lly
    }

    pub fn is_portrait(&self) -> bool {
        self.width() < self.height()
    }

    /// Split at the horizontal midpoint into (left, right) halves.
    pub fn halves(&self) -> (Rect, Rect) {
        let mid = self.llx + self.width() / 2.0;
        (
            Rect { urx: mid, ..*self },
            Rect { llx: mid, ..*self },
        )
    }

    fn from_object(obj: &Object) -> Result<Self> {
        let values = obj
            .as_array()?
            .iter()
            .map(|v| v.as_float().map_err(|e| anyhow!("Invalid box coordinate: {}", e)))
            .collect::<Result<Vec<f32>>>()?;
        match values.as_slice() {
            &[x1, y1, x2, y2] => Ok(Rect {
                llx: x1.min(x2),
                lly: y1.min(y2),
                urx: x1.max(x2),
                ury: y1.max(y2),
            }),
            _ => Err(anyhow!("Page box must have 4 numbers, found {}", values.len())),
        }
    }

    pub fn to_object(self) -> Object {
        Object::Array(vec![
            Object::Real(self.llx),
            Object::Real(self.lly),
            Object::Real(self.urx),
            Object::Real(self.ury),
        ])
    }
}

pub struct PdfDocument {
    pub doc: Document,
}

impl PdfDocument {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let doc = Document::load(path)
            .with_context(|| format!("Failed to open PDF: {}", path.display()))?;
        Ok(PdfDocument { doc })
    }

    /// Get 1-indexed page object IDs
    pub fn page_ids(&self) -> Vec<(u32, ObjectId)> {
        let mut pages: Vec<_> = self.doc.get_pages().into_iter().collect();
        pages.sort_by_key(|(num, _)| *num);
        pages
    }

    /// The page's MediaBox, looked up through the page tree if the page
    /// does not carry its own.
    pub fn media_box(&self, page_id: ObjectId) -> Result<Rect> {
        let dict = self.resolved_page(page_id)?;
        let media_box = dict
            .get(b"MediaBox")
            .map_err(|_| anyhow!("Page {:?} has no MediaBox", page_id))?;
        let media_box = match media_box {
            Object::Reference(id) => self.doc.get_object(*id)?,
            other => other,
        };
        Rect::from_object(media_box)
    }

    /// A copy of the page dictionary with inherited attributes filled in.
    pub fn resolved_page(&self, page_id: ObjectId) -> Result<Dictionary> {
        let mut dict = self
            .doc
            .get_dictionary(page_id)
            .with_context(|| format!("Missing page object {:?}", page_id))?
            .clone();

        let mut parent = dict.get(b"Parent").and_then(Object::as_reference).ok();
        let mut depth = 0;
        while let Some(parent_id) = parent {
            depth += 1;
            if depth > 64 {
                anyhow::bail!("Page tree too deep at page {:?}", page_id);
            }
            let node = self.doc.get_dictionary(parent_id)?;
            for key in INHERITABLE {
                if !dict.has(key) {
                    if let Ok(value) = node.get(key) {
                        dict.set(key.to_vec(), value.clone());
                    }
                }
            }
            parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        }
        Ok(dict)
    }

    /// Replace the page tree with a flat list of page dictionaries, in order.
    /// Objects no longer reachable afterwards are dropped.
    pub fn replace_pages(&mut self, pages: Vec<Dictionary>) -> Result<()> {
        let pages_id = self
            .doc
            .catalog()?
            .get(b"Pages")
            .and_then(Object::as_reference)
            .context("Catalog has no page tree")?;

        let mut kids = Vec::with_capacity(pages.len());
        for mut page in pages {
            page.set("Parent", Object::Reference(pages_id));
            kids.push(Object::Reference(self.doc.add_object(page)));
        }

        let root = self.doc.get_dictionary_mut(pages_id)?;
        root.set("Count", Object::Integer(kids.len() as i64));
        root.set("Kids", Object::Array(kids));
        for key in INHERITABLE {
            root.remove(key);
        }

        let pruned = self.doc.prune_objects();
        log::debug!("Pruned {} unreachable objects", pruned.len());
        Ok(())
    }

    /// Save to a file
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.doc
            .save(&path)
            .with_context(|| format!("Failed to save PDF: {}", path.as_ref().display()))?;
        Ok(())
    }
}
