//! # Pedigree Trees
//!
//! Ancestry and descendancy results are flat person lists whose display
//! properties carry a position number. The trees here index those lists so
//! callers can walk them.
//!
//! - Ancestry uses Ahnentafel numbering: the subject is 1, the father of
//!   person `n` is `2n`, the mother is `2n + 1`.
//! - Descendancy uses d'Aboville numbering: the subject is `1`, its spouse
//!   `1-S`, its children `1.1`, `1.2`, ..., their spouses `1.1-S`.
//!
//! Persons without a number, or with one that does not parse, are left out.

use std::collections::BTreeMap;

use gx_model::{Gedcomx, Person};

use super::{AncestryResultsState, DescendancyResultsState};

// ─── Ancestry ────────────────────────────────────────────────────────

/// An Ahnentafel-indexed ancestry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AncestryTree {
    persons: BTreeMap<u64, Person>,
}

impl AncestryTree {
    pub fn from_document(document: &Gedcomx) -> Self {
        let persons = document
            .persons
            .iter()
            .filter_map(|person| {
                let number = person.display.as_ref()?.ascendancy_number.as_deref()?;
                let number = number.trim().parse::<u64>().ok().filter(|n| *n > 0)?;
                Some((number, person.clone()))
            })
            .collect();
        Self { persons }
    }

    /// The subject of the query, number 1.
    pub fn root(&self) -> Option<AncestryNode<'_>> {
        self.node(1)
    }

    pub fn node(&self, number: u64) -> Option<AncestryNode<'_>> {
        self.persons.get(&number).map(|person| AncestryNode {
            tree: self,
            number,
            person,
        })
    }

    /// Persons in Ahnentafel order.
    pub fn persons(&self) -> impl Iterator<Item = (u64, &Person)> {
        self.persons.iter().map(|(n, p)| (*n, p))
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }
}

/// A person's position in an [`AncestryTree`].
#[derive(Debug, Clone, Copy)]
pub struct AncestryNode<'a> {
    tree: &'a AncestryTree,
    number: u64,
    person: &'a Person,
}

impl<'a> AncestryNode<'a> {
    pub fn number(&self) -> u64 {
        self.number
    }

    pub fn person(&self) -> &'a Person {
        self.person
    }

    pub fn father(&self) -> Option<AncestryNode<'a>> {
        self.number.checked_mul(2).and_then(|n| self.tree.node(n))
    }

    pub fn mother(&self) -> Option<AncestryNode<'a>> {
        self.number
            .checked_mul(2)
            .and_then(|n| n.checked_add(1))
            .and_then(|n| self.tree.node(n))
    }

    /// Number of generations above the subject (the subject is 0).
    pub fn generation(&self) -> u32 {
        self.number.ilog2()
    }
}

// ─── Descendancy ─────────────────────────────────────────────────────

const SPOUSE_SUFFIX: &str = "-S";

/// A d'Aboville-indexed descendancy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescendancyTree {
    persons: BTreeMap<String, Person>,
}

impl DescendancyTree {
    pub fn from_document(document: &Gedcomx) -> Self {
        let persons = document
            .persons
            .iter()
            .filter_map(|person| {
                let number = person.display.as_ref()?.descendancy_number.as_deref()?.trim();
                (!number.is_empty()).then(|| (number.to_string(), person.clone()))
            })
            .collect();
        Self { persons }
    }

    /// The subject of the query, number `1`.
    pub fn root(&self) -> Option<DescendancyNode<'_>> {
        self.node("1")
    }

    pub fn node(&self, number: &str) -> Option<DescendancyNode<'_>> {
        self.persons.get_key_value(number).map(|(number, person)| DescendancyNode {
            tree: self,
            number,
            person,
        })
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }
}

/// A person's position in a [`DescendancyTree`].
#[derive(Debug, Clone, Copy)]
pub struct DescendancyNode<'a> {
    tree: &'a DescendancyTree,
    number: &'a str,
    person: &'a Person,
}

impl<'a> DescendancyNode<'a> {
    pub fn number(&self) -> &'a str {
        self.number
    }

    pub fn person(&self) -> &'a Person {
        self.person
    }

    pub fn is_spouse(&self) -> bool {
        self.number.contains(SPOUSE_SUFFIX)
    }

    /// The first spouse (`<n>-S`, or `<n>-S1` when spouses are counted).
    pub fn spouse(&self) -> Option<DescendancyNode<'a>> {
        self.spouses().into_iter().next()
    }

    /// Every spouse, in numbering order.
    pub fn spouses(&self) -> Vec<DescendancyNode<'a>> {
        if self.is_spouse() {
            return Vec::new();
        }
        let prefix = format!("{}{SPOUSE_SUFFIX}", self.number);
        self.tree
            .persons
            .keys()
            .filter(|k| k.strip_prefix(prefix.as_str()).is_some_and(|rest| rest.chars().all(|c| c.is_ascii_digit())))
            .filter_map(|k| self.tree.node(k))
            .collect()
    }

    /// Direct children (`<n>.1`, `<n>.2`, ...), in birth order.
    pub fn children(&self) -> Vec<DescendancyNode<'a>> {
        if self.is_spouse() {
            return Vec::new();
        }
        let prefix = format!("{}.", self.number);
        let mut children: Vec<(u32, DescendancyNode<'a>)> = self
            .tree
            .persons
            .keys()
            .filter_map(|k| {
                let ordinal = k.strip_prefix(prefix.as_str())?.parse::<u32>().ok()?;
                Some((ordinal, self.tree.node(k)?))
            })
            .collect();
        children.sort_by_key(|(ordinal, _)| *ordinal);
        children.into_iter().map(|(_, node)| node).collect()
    }
}

// ─── States ──────────────────────────────────────────────────────────

impl AncestryResultsState {
    /// Index the returned persons by Ahnentafel number.
    pub fn tree(&self) -> AncestryTree {
        self.entity().map(AncestryTree::from_document).unwrap_or_default()
    }
}

impl DescendancyResultsState {
    /// Index the returned persons by d'Aboville number.
    pub fn tree(&self) -> DescendancyTree {
        self.entity().map(DescendancyTree::from_document).unwrap_or_default()
    }
}
