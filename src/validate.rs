// Collection schema checks
// Structural validation run after the build when --validate is set

use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::idgen::is_valid_uid;
use crate::models::{Collection, Item, RequestItem};

struct Checker<'a> {
    seen: HashSet<&'a str>,
}

impl<'a> Checker<'a> {
    fn uid(&mut self, uid: &'a str, what: &str) -> Result<()> {
        if !is_valid_uid(uid) {
            return Err(invalid(format!("{} has malformed uid {:?}", what, uid)));
        }
        if !self.seen.insert(uid) {
            return Err(invalid(format!("{} reuses uid {}", what, uid)));
        }
        Ok(())
    }

    fn items(&mut self, items: &'a [Item]) -> Result<()> {
        for item in items {
            if item.name().trim().is_empty() {
                return Err(invalid(format!("item {} has an empty name", item.uid())));
            }
            match item {
                Item::Folder(folder) => {
                    self.uid(&folder.uid, &format!("folder {:?}", folder.name))?;
                    self.items(&folder.items)?;
                }
                Item::Request(req) => self.request(req)?,
            }
        }
        Ok(())
    }

    fn request(&mut self, req: &'a RequestItem) -> Result<()> {
        let what = format!("request {:?}", req.name);
        self.uid(&req.uid, &what)?;
        if req.kind.is_legacy() {
            return Err(invalid(format!("{} still uses a legacy type tag", what)));
        }
        match req.seq {
            Some(seq) if seq >= 1 => {}
            _ => return Err(invalid(format!("{} has no sequence number", what))),
        }
        if req.request.url.trim().is_empty() {
            return Err(invalid(format!("{} has an empty url", what)));
        }
        if req.request.query.is_some() {
            return Err(invalid(format!("{} still carries legacy query params", what)));
        }
        let r = &req.request;
        for uid in r
            .headers
            .iter()
            .map(|h| h.uid.as_str())
            .chain(r.params.iter().map(|p| p.uid.as_str()))
            .chain(r.vars.req.iter().chain(&r.vars.res).map(|v| v.uid.as_str()))
            .chain(r.assertions.iter().map(|a| a.uid.as_str()))
        {
            self.uid(uid, &what)?;
        }
        Ok(())
    }
}

fn invalid(msg: String) -> Error {
    Error::Validation(msg)
}

/// Check `collection` against the shape the client expects; the first violation wins.
pub fn validate_collection(collection: &Collection) -> Result<()> {
    if collection.version != Collection::VERSION {
        return Err(invalid(format!("unsupported collection version {:?}", collection.version)));
    }
    if collection.name.trim().is_empty() {
        return Err(invalid("collection name is empty".to_string()));
    }
    let mut checker = Checker { seen: HashSet::new() };
    checker.uid(&collection.uid, "collection")?;
    checker.items(&collection.items)?;
    for env in &collection.environments {
        if env.name.trim().is_empty() {
            return Err(invalid(format!("environment {} has an empty name", env.uid)));
        }
        checker.uid(&env.uid, &format!("environment {:?}", env.name))?;
        for var in &env.variables {
            if var.name.trim().is_empty() {
                return Err(invalid(format!("environment {:?} has an unnamed variable", env.name)));
            }
            checker.uid(&var.uid, &format!("environment {:?}", env.name))?;
        }
    }
    Ok(())
}
