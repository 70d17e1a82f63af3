//! Array expansion and tree assembly over flat, level-numbered descriptors.

use crate::types::FieldDescriptor;

/// Replaces every static array with one renamed copy per index.
///
/// A 1-D array `ITEM` of size 3 becomes `ITEM(1)`, `ITEM(2)`, `ITEM(3)`, each
/// followed by its own copy of the subordinate fields. A 2-D array iterates
/// the outer dimension first: `ITEM(1,1)`, `ITEM(1,2)`, ... Nested arrays
/// inside an array body are expanded as well.
pub fn expand_arrays(fields: &[FieldDescriptor]) -> Vec<FieldDescriptor> {
    let mut out = Vec::with_capacity(fields.len());
    let mut i = 0;

    while i < fields.len() {
        let field = &fields[i];
        if !field.is_array() {
            out.push(field.clone());
            i += 1;
            continue;
        }

        let end = subtree_end(fields, i);
        let body = expand_arrays(&fields[i + 1..end]);
        for name in indexed_names(field) {
            out.push(field.renamed(name));
            out.extend(body.iter().cloned());
        }
        i = end;
    }
    out
}

/// Index one past the last item belonging to the subtree starting at `start`.
fn subtree_end(fields: &[FieldDescriptor], start: usize) -> usize {
    let level = fields[start].level;
    fields[start + 1..]
        .iter()
        .position(|f| f.level <= level)
        .map_or(fields.len(), |n| start + 1 + n)
}

fn indexed_names(field: &FieldDescriptor) -> Vec<String> {
    let name = &field.name;
    if field.array_dim2 > 0 {
        (1..=field.array_dim1)
            .flat_map(|i| (1..=field.array_dim2).map(move |j| format!("{name}({i},{j})")))
            .collect()
    } else {
        (1..=field.array_dim1).map(|i| format!("{name}({i})")).collect()
    }
}

/// Nests a flat descriptor sequence by level number.
///
/// An item becomes a child of the nearest preceding item with a strictly
/// lower level. Items with no such ancestor are returned as roots.
pub fn build_tree(flat: Vec<FieldDescriptor>) -> Vec<FieldDescriptor> {
    let mut roots = Vec::new();
    let mut stack: Vec<FieldDescriptor> = Vec::new();

    for field in flat {
        while stack.last().is_some_and(|top| top.level >= field.level) {
            close_top(&mut stack, &mut roots);
        }
        stack.push(field);
    }
    while !stack.is_empty() {
        close_top(&mut stack, &mut roots);
    }
    roots
}

fn close_top(stack: &mut Vec<FieldDescriptor>, roots: &mut Vec<FieldDescriptor>) {
    if let Some(done) = stack.pop() {
        match stack.last_mut() {
            Some(parent) => parent.children.push(done),
            None => roots.push(done),
        }
    }
}
