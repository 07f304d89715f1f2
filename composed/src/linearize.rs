use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::errors::ComposeError;
use crate::mixin::MixinDef;

/////////////////////////////////////////////////////////////////////////////////////////

/// Computes the C3 linearization of a composition declared with `bases`
/// (most-specific first). The composition itself is not part of the result.
pub(crate) fn linearize(
    composition: &str,
    bases: &[Arc<MixinDef>],
) -> Result<Vec<Arc<MixinDef>>, ComposeError> {
    let mut lin = Linearizer {
        composition,
        memo: HashMap::new(),
        known: HashMap::new(),
    };

    let order = lin.linearize_bases(bases)?;

    if order.iter().any(|m| m.name() == composition) {
        return Err(ComposeError::ConflictingMixin {
            name: composition.to_string(),
        });
    }

    Ok(order)
}

/////////////////////////////////////////////////////////////////////////////////////////

struct Linearizer<'a> {
    composition: &'a str,
    memo: HashMap<String, Vec<Arc<MixinDef>>>,
    known: HashMap<String, Arc<MixinDef>>,
}

impl Linearizer<'_> {
    fn linearize_bases(
        &mut self,
        bases: &[Arc<MixinDef>],
    ) -> Result<Vec<Arc<MixinDef>>, ComposeError> {
        let mut seqs = Vec::with_capacity(bases.len() + 1);

        for base in bases {
            let lin = self.linearize_one(base)?;
            seqs.push(VecDeque::from(lin));
        }
        seqs.push(bases.iter().cloned().collect());

        merge(seqs).map_err(|message| ComposeError::Linearization {
            composition: self.composition.to_string(),
            message,
        })
    }

    fn linearize_one(&mut self, mixin: &Arc<MixinDef>) -> Result<Vec<Arc<MixinDef>>, ComposeError> {
        self.register(mixin)?;

        if let Some(lin) = self.memo.get(mixin.name()) {
            return Ok(lin.clone());
        }

        let mut lin = vec![mixin.clone()];
        lin.extend(self.linearize_bases(mixin.bases())?);

        self.memo.insert(mixin.name().to_string(), lin.clone());
        Ok(lin)
    }

    fn register(&mut self, mixin: &Arc<MixinDef>) -> Result<(), ComposeError> {
        match self.known.get(mixin.name()) {
            Some(existing) if !Arc::ptr_eq(existing, mixin) => {
                Err(ComposeError::ConflictingMixin {
                    name: mixin.name().to_string(),
                })
            }
            Some(_) => Ok(()),
            None => {
                self.known.insert(mixin.name().to_string(), mixin.clone());
                Ok(())
            }
        }
    }
}

/////////////////////////////////////////////////////////////////////////////////////////

fn merge(mut seqs: Vec<VecDeque<Arc<MixinDef>>>) -> Result<Vec<Arc<MixinDef>>, String> {
    let mut ret = Vec::new();

    loop {
        seqs.retain(|s| !s.is_empty());
        if seqs.is_empty() {
            return Ok(ret);
        }

        // Good head is one that does not appear in the tail of any sequence
        let head = seqs
            .iter()
            .filter_map(|s| s.front())
            .find(|candidate| {
                !seqs
                    .iter()
                    .any(|s| s.iter().skip(1).any(|m| m.name() == candidate.name()))
            })
            .cloned();

        let Some(head) = head else {
            let heads: Vec<_> = seqs
                .iter()
                .filter_map(|s| s.front())
                .map(|m| format!("`{}`", m.name()))
                .collect();
            return Err(format!(
                "no consistent order exists between {}",
                heads.join(", ")
            ));
        };

        for s in &mut seqs {
            if s.front().is_some_and(|m| m.name() == head.name()) {
                s.pop_front();
            }
        }

        ret.push(head);
    }
}

/////////////////////////////////////////////////////////////////////////////////////////
