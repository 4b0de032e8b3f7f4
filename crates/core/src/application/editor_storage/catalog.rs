// Catalog Listing - newest version per library

use crate::domain::{EditorLibrary, StoredLibrary};
use std::collections::HashMap;

/// Build the editor catalog from title-ordered rows
///
/// Every row is kept, in input order. Per library name exactly one entry (the newest
/// version) stays unmarked. Everything else gets `is_old = true`. When two rows carry
/// the same version the first one wins.
pub fn build_catalog(rows: Vec<StoredLibrary>, privileged: bool) -> Vec<EditorLibrary> {
    let mut catalog: Vec<EditorLibrary> = Vec::with_capacity(rows.len());
    // library name -> index of its current newest entry in `catalog`
    let mut newest: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let mut library = EditorLibrary::from_stored(row, privileged);
        let index = catalog.len();

        match newest.get(&library.name).copied() {
            Some(best) if library.version().is_newer_than(&catalog[best].version()) => {
                catalog[best].is_old = true;
                newest.insert(library.name.clone(), index);
            }
            Some(_) => library.is_old = true,
            None => {
                newest.insert(library.name.clone(), index);
            }
        }

        catalog.push(library);
    }

    catalog
}
