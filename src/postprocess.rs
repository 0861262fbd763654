// Collection post-processing
// Legacy field migration, sequence hydration and uid re-keying; each pass returns a new tree

use crate::idgen::uid;
use crate::models::{Collection, Environment, Item, RequestItem};
use crate::utils::normalize_file_name;

/// Rewrite legacy fields and normalize display names.
///
/// `http`/`graphql` type tags become `http-request`/`graphql-request`, a legacy
/// `request.query` list replaces `request.params`, and every item name is passed through
/// [`normalize_file_name`].
pub fn migrate_fields(mut collection: Collection) -> Collection {
    collection.items = collection.items.into_iter().map(migrate_item).collect();
    collection
}

fn migrate_item(item: Item) -> Item {
    match item {
        Item::Folder(mut folder) => {
            folder.name = normalize_file_name(&folder.name);
            folder.items = folder.items.into_iter().map(migrate_item).collect();
            Item::Folder(folder)
        }
        Item::Request(mut req) => {
            req.name = normalize_file_name(&req.name);
            req.kind = req.kind.migrated();
            if let Some(query) = req.request.query.take() {
                req.request.params = query;
            }
            Item::Request(req)
        }
    }
}

fn needs_seq(req: &RequestItem) -> bool {
    !req.kind.is_legacy() && req.seq.map_or(true, |s| s == 0)
}

/// Number requests 1, 2, 3, ... within each sibling group, depth-first.
///
/// Requests that already carry a sequence keep it and do not advance the counter, so
/// pre-numbered input may end up with gaps or duplicates.
pub fn hydrate_seq(mut collection: Collection) -> Collection {
    collection.items = hydrate_items(collection.items);
    collection
}

fn hydrate_items(items: Vec<Item>) -> Vec<Item> {
    let mut next = 1;
    items
        .into_iter()
        .map(|item| match item {
            Item::Request(mut req) => {
                if needs_seq(&req) {
                    req.seq = Some(next);
                    next += 1;
                }
                Item::Request(req)
            }
            Item::Folder(mut folder) => {
                folder.items = hydrate_items(folder.items);
                Item::Folder(folder)
            }
        })
        .collect()
}

/// Copy of `collection` with fresh uids on every entity and nested list entry.
pub fn rekey(collection: &Collection) -> Collection {
    let mut copy = collection.clone();
    copy.uid = uid();
    rekey_items(&mut copy.items);
    copy.environments.iter_mut().for_each(rekey_environment);
    copy
}

fn rekey_items(items: &mut [Item]) {
    for item in items {
        match item {
            Item::Folder(folder) => {
                folder.uid = uid();
                rekey_items(&mut folder.items);
            }
            Item::Request(req) => {
                req.uid = uid();
                let r = &mut req.request;
                r.headers.iter_mut().for_each(|h| h.uid = uid());
                r.params.iter_mut().for_each(|p| p.uid = uid());
                r.query.iter_mut().flatten().for_each(|p| p.uid = uid());
                r.vars.req.iter_mut().for_each(|v| v.uid = uid());
                r.vars.res.iter_mut().for_each(|v| v.uid = uid());
                r.assertions.iter_mut().for_each(|a| a.uid = uid());
                if let Some(fields) = r.body.form_fields_mut() {
                    fields.iter_mut().for_each(|f| f.uid = uid());
                }
            }
        }
    }
}

fn rekey_environment(env: &mut Environment) {
    env.uid = uid();
    env.variables.iter_mut().for_each(|v| v.uid = uid());
}
