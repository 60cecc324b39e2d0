//! The online DRUP proof checker.
//!
//! Receives the same clause events a SAT solver emits — original clauses,
//! learned clauses, deletions — and proves each learned clause is an
//! asymmetric tautology of the previously accepted clauses via unit
//! propagation. Ported from `catch.c`, generalized from its intrusive
//! pointer-linked watch lists to an arena of clauses indexed by a small
//! `ClauseId`, with two `next`-index arrays standing in for the two
//! `next[2]` pointers of the C `struct clause` — an arena layout makes this
//! substitution trivial, since the whole arena can be walked directly
//! instead of chasing pointers.
//!
//! Every hard check here (unimplied learned clause, missing delete target,
//! API misuse, leak-check violation) is fatal: there is no recovery path.

use crate::error::{checker_fatal, invalid_usage};
use crate::lit::Lit;
use crate::stack::Stack;

const INVALID: u32 = u32::MAX;

/// Garbage collection is scheduled with an arithmetic back-off: after
/// `collections * GC_INTERVAL` further add operations since the last GC.
const GC_INTERVAL: u64 = 10_000;

#[derive(Debug, Clone)]
struct ClauseData {
    lits: Vec<Lit>,
    /// `next[0]` continues the watch list of `lits[0]`, `next[1]` that of
    /// `lits[1]`.
    next: [u32; 2],
}

/// Running counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stats {
    pub original: u64,
    pub learned: u64,
    pub deleted: u64,
    pub collected: u64,
    pub collections: u64,
    pub clauses: u64,
    pub remained: u64,
}

#[derive(Debug)]
pub struct Checker {
    size: usize,
    inconsistent: bool,
    marks: Vec<i8>,
    values: Vec<i8>,
    watches: Vec<u32>,
    arena: Vec<Option<ClauseData>>,
    free_list: Vec<u32>,
    pending: Stack<Lit>,
    trail: Stack<Lit>,
    stats: Stats,
    verbose: bool,
    logging: bool,
    leak_checking: bool,
    new_units: u64,
    gc_wait: u64,
}

impl Default for Checker {
    fn default() -> Self {
        Self::new()
    }
}

impl Checker {
    pub fn new() -> Checker {
        Checker {
            size: 0,
            inconsistent: false,
            marks: Vec::new(),
            values: Vec::new(),
            watches: Vec::new(),
            arena: Vec::new(),
            free_list: Vec::new(),
            pending: Stack::new(),
            trail: Stack::new(),
            stats: Stats::default(),
            verbose: false,
            logging: false,
            leak_checking: false,
            new_units: 0,
            gc_wait: GC_INTERVAL,
        }
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn is_inconsistent(&self) -> bool {
        self.inconsistent
    }

    /// Idempotent toggles. All three are cheap flags; the
    /// only behavioral difference they make is whether `log::info!`/
    /// `log::debug!` calls fire and whether `release` runs the leak check.
    pub fn set_verbose(&mut self, on: bool) {
        self.verbose = on;
    }

    pub fn set_logging(&mut self, on: bool) {
        self.logging = on;
    }

    pub fn enable_leak_checking(&mut self, on: bool) {
        self.leak_checking = on;
    }

    /// Grows `marks`/`values`/`watches` to fit `lit`, doubling the
    /// allocation as needed and zero-initializing fresh cells; sizes grow
    /// monotonically and are never shrunk.
    fn import(&mut self, lit: Lit) {
        let required = (lit.index() | 1) + 1;
        if required > self.size {
            let mut new_size = if self.size == 0 { 1 } else { self.size * 2 };
            while required > new_size {
                new_size *= 2;
            }
            self.marks.resize(new_size, 0);
            self.values.resize(new_size, 0);
            self.watches.resize(new_size, INVALID);
            self.size = new_size;
        }
    }

    /// `add_literal(checker, lit)`: accumulate into the pending clause.
    pub fn add_literal(&mut self, elit: i32) {
        let lit = match Lit::from_external(elit) {
            Ok(lit) => lit,
            Err(crate::lit::LitError::Zero) => {
                invalid_usage("add_literal", "zero literal argument")
            }
            Err(crate::lit::LitError::IntMin) => {
                invalid_usage("add_literal", "'INT_MIN' literal argument")
            }
        };
        self.import(lit);
        self.pending.push(lit);
    }

    fn value(&self, lit: Lit) -> i8 {
        self.values[lit.index()]
    }

    /// Normalizes the pending clause in place: drops literals already false
    /// at the root (no semantic effect), detects triviality (a true
    /// literal, or both polarities present), and deduplicates via `marks`.
    /// Returns `true` if the clause is trivial and should be skipped
    /// entirely. Marks of the surviving (deduplicated) literals are left
    /// set on return — the op-specific step that follows (`commit_pending`
    /// or `remove_matching_clause`) may still need them, e.g. to match a
    /// delete target by its literal set. [`Checker::clear_pending`] is the
    /// one that zeroes them again, at the very end of the public operation:
    /// outside the ingestion primitive, all marks are zero.
    fn normalize_pending(&mut self) -> bool {
        let mut trivial = false;
        let mut write = 0usize;
        let len = self.pending.len();
        for read in 0..len {
            if trivial {
                break;
            }
            let lit = *self.pending.get(read);
            if self.value(lit) > 0 {
                trivial = true;
                break;
            }
            if self.marks[lit.index()] != 0 {
                continue;
            }
            if self.marks[lit.not().index()] != 0 {
                trivial = true;
                break;
            }
            self.marks[lit.index()] = 1;
            self.pending.swap(read, write);
            write += 1;
        }
        self.pending.truncate(write);
        trivial
    }

    /// Clears marks of whatever is left in the pending clause and empties
    /// it, the way `checker_clear_clause` does at the end of every public
    /// commit/delete operation.
    fn clear_pending(&mut self) {
        for i in 0..self.pending.len() {
            let lit = *self.pending.get(i);
            self.marks[lit.index()] = 0;
        }
        self.pending.clear();
    }

    fn assign(&mut self, lit: Lit) {
        let not_lit = lit.not();
        debug_assert_eq!(self.values[lit.index()], 0);
        debug_assert_eq!(self.values[not_lit.index()], 0);
        self.values[not_lit.index()] = -1;
        self.values[lit.index()] = 1;
        self.trail.push(lit);
    }

    /// BFS propagation over the trail using the two-watched-literal scheme.
    /// Returns `false` on conflict; the trail is left as-is either way (the
    /// caller decides whether to clear it or backtrack it).
    fn propagate(&mut self) -> bool {
        let mut head = 0usize;
        while head < self.trail.len() {
            let lit = *self.trail.get(head);
            head += 1;
            let not_lit = lit.not();

            let mut prev: Option<(u32, usize)> = None;
            let mut cur = self.watches[not_lit.index()];

            while cur != INVALID {
                let clause_idx = cur as usize;
                let pos = if self.arena[clause_idx].as_ref().unwrap().lits[1] == not_lit {
                    1
                } else {
                    0
                };
                debug_assert_eq!(
                    self.arena[clause_idx].as_ref().unwrap().lits[pos],
                    not_lit
                );
                let other = self.arena[clause_idx].as_ref().unwrap().lits[1 - pos];
                let other_value = self.value(other);

                if other_value > 0 {
                    prev = Some((cur, pos));
                    cur = self.arena[clause_idx].as_ref().unwrap().next[pos];
                    continue;
                }

                let mut replacement = None;
                {
                    let lits = &self.arena[clause_idx].as_ref().unwrap().lits;
                    for k in 2..lits.len() {
                        if self.value(lits[k]) >= 0 {
                            replacement = Some(k);
                            break;
                        }
                    }
                }

                if let Some(k) = replacement {
                    let next_cur = self.arena[clause_idx].as_ref().unwrap().next[pos];
                    match prev {
                        Some((pc, ppos)) => {
                            self.arena[pc as usize].as_mut().unwrap().next[ppos] = next_cur;
                        }
                        None => self.watches[not_lit.index()] = next_cur,
                    }

                    let clause = self.arena[clause_idx].as_mut().unwrap();
                    clause.lits.swap(pos, k);
                    let replacement_lit = clause.lits[pos];

                    let head_of_replacement = self.watches[replacement_lit.index()];
                    self.arena[clause_idx].as_mut().unwrap().next[pos] = head_of_replacement;
                    self.watches[replacement_lit.index()] = cur;

                    cur = next_cur;
                } else if other_value < 0 {
                    return false;
                } else {
                    debug_assert_eq!(other_value, 0);
                    self.assign(other);
                    prev = Some((cur, pos));
                    cur = self.arena[clause_idx].as_ref().unwrap().next[pos];
                }
            }
        }
        true
    }

    fn backtrack(&mut self) {
        while !self.trail.is_empty() {
            let lit = self.trail.pop();
            let not_lit = lit.not();
            self.values[lit.index()] = 0;
            self.values[not_lit.index()] = 0;
        }
    }

    fn alloc_clause(&mut self, lits: Vec<Lit>) -> u32 {
        let data = ClauseData {
            lits,
            next: [INVALID, INVALID],
        };
        if let Some(id) = self.free_list.pop() {
            self.arena[id as usize] = Some(data);
            id
        } else {
            let id = self.arena.len() as u32;
            self.arena.push(Some(data));
            id
        }
    }

    fn free_clause(&mut self, id: u32) {
        self.arena[id as usize] = None;
        self.free_list.push(id);
    }

    /// Watches the first two literals of the (already size-checked) pending
    /// clause, and links the new clause into their watch lists.
    fn watch_pending(&mut self) {
        let size = self.pending.len();
        debug_assert!(size >= 2);
        let lits: Vec<Lit> = self.pending.as_slice().to_vec();
        let a = lits[0];
        let b = lits[1];
        let id = self.alloc_clause(lits);
        {
            let clause = self.arena[id as usize].as_mut().unwrap();
            clause.next[0] = self.watches[a.index()];
            clause.next[1] = self.watches[b.index()];
        }
        self.watches[a.index()] = id;
        self.watches[b.index()] = id;
        self.stats.clauses += 1;
    }

    /// `checker_add_clause`: accepts the normalized, non-trivial pending
    /// clause. Empty -> inconsistent. Unit -> assign + propagate
    /// permanently. Size >= 2 -> swap the first two non-false literals to
    /// the front (stopping the scan as soon as both are found — the rest of
    /// the clause keeps whatever order it already had, since propagation
    /// only needs *some* non-false literal among positions 2.. when a watch
    /// is kicked, not a fully sorted suffix) and watch them.
    fn commit_pending(&mut self) {
        let len = self.pending.len();
        let mut write = 0usize;
        let mut unit = None;
        let mut non_false = 0usize;

        for read in 0..len {
            let lit = *self.pending.get(read);
            debug_assert!(self.value(lit) <= 0);
            if self.value(lit) < 0 {
                continue;
            }
            if read != write {
                self.pending.swap(read, write);
            }
            write += 1;
            if non_false == 0 {
                unit = Some(lit);
            }
            non_false += 1;
            if non_false > 1 {
                break;
            }
        }

        if non_false == 0 {
            self.inconsistent = true;
        } else if non_false == 1 {
            let unit = unit.unwrap();
            debug_assert_eq!(unit, *self.pending.get(0));
            self.assign(unit);
            if self.propagate() {
                self.trail.clear();
            } else {
                self.inconsistent = true;
            }
            self.new_units += 1;
        } else {
            self.watch_pending();
        }
    }

    /// `checker_original`: commit the pending clause as an original clause.
    pub fn add_original(&mut self) {
        if self.inconsistent {
            self.pending.clear();
            return;
        }
        #[cfg(feature = "logging")]
        if self.logging {
            log::debug!("original clause {}", self.format_pending());
        }
        let trivial = self.normalize_pending();
        if !trivial {
            self.commit_pending();
        }
        self.stats.original += 1;
        self.clear_pending();
        self.maybe_collect_garbage();
    }

    /// Checks that the pending clause is DRUP-implied: assuming every
    /// literal false in order and propagating after each, either a literal
    /// is already true (subsumed) or propagation conflicts. Fatal if
    /// neither happens once every literal has been processed (spec §4.3
    /// "Learned add").
    fn check_drup_implied(&mut self) {
        debug_assert!(self.trail.is_empty());
        let mut failed = false;
        let len = self.pending.len();
        for i in 0..len {
            let lit = *self.pending.get(i);
            let value = self.value(lit);
            if value > 0 {
                failed = true;
            } else if value == 0 {
                self.assign(lit.not());
                if !self.propagate() {
                    failed = true;
                }
            }
            if failed {
                break;
            }
        }
        self.backtrack();
        if !failed {
            checker_fatal!("learned clause not implied");
        }
    }

    /// `checker_learned`: verify then commit the pending clause as learned.
    pub fn add_learned(&mut self) {
        if self.inconsistent {
            self.pending.clear();
            return;
        }
        #[cfg(feature = "logging")]
        if self.logging {
            log::debug!("learned clause {}", self.format_pending());
        }
        self.check_drup_implied();
        let trivial = self.normalize_pending();
        if !trivial {
            self.commit_pending();
        }
        self.stats.learned += 1;
        self.clear_pending();
    }

    /// `checker_remove_clause`: find a stored clause whose size and literal
    /// set (taking the pending clause's marks) matches exactly, unlink it
    /// from both of its watch lists, and free it. Fatal if no match is
    /// found (spec §4.3 "Delete").
    fn remove_matching_clause(&mut self) {
        let size = self.pending.len();
        for lit in self.pending.as_slice().to_vec() {
            let mut prev: Option<(u32, usize)> = None;
            let mut cur = self.watches[lit.index()];
            while cur != INVALID {
                let idx = cur as usize;
                let pos = if self.arena[idx].as_ref().unwrap().lits[1] == lit {
                    1
                } else {
                    0
                };
                let next = self.arena[idx].as_ref().unwrap().next[pos];

                let matches = {
                    let clause = self.arena[idx].as_ref().unwrap();
                    clause.lits.len() == size
                        && clause.lits.iter().all(|l| self.marks[l.index()] != 0)
                };

                if matches {
                    match prev {
                        Some((pc, ppos)) => {
                            self.arena[pc as usize].as_mut().unwrap().next[ppos] = next;
                        }
                        None => self.watches[lit.index()] = next,
                    }
                    self.unlink_second_watch(idx as u32, lit, pos);
                    self.free_clause(idx as u32);
                    self.stats.clauses -= 1;
                    self.stats.deleted += 1;
                    return;
                }

                prev = Some((cur, pos));
                cur = next;
            }
        }
        checker_fatal!("clause requested to delete not found");
    }

    /// Unlinks clause `idx` from the watch list of its *other* watched
    /// literal (the one that isn't `found_via`), by scanning linearly for
    /// the back-pointer. Intentional O(n) cost, trading deletion speed for
    /// not storing a doubly linked list per watch (spec §4.3).
    fn unlink_second_watch(&mut self, idx: u32, found_via: Lit, found_pos: usize) {
        let other_pos = 1 - found_pos;
        let other_lit = self.arena[idx as usize].as_ref().unwrap().lits[other_pos];
        if other_lit == found_via {
            // Both watch positions reference the same unlinked slot only if
            // the clause degenerates (can't happen for size >= 2 with two
            // distinct watched literals), kept defensively.
            return;
        }
        let mut prev: Option<(u32, usize)> = None;
        let mut cur = self.watches[other_lit.index()];
        while cur != INVALID {
            if cur == idx {
                let pos = other_pos;
                let next = self.arena[idx as usize].as_ref().unwrap().next[pos];
                match prev {
                    Some((pc, ppos)) => {
                        self.arena[pc as usize].as_mut().unwrap().next[ppos] = next;
                    }
                    None => self.watches[other_lit.index()] = next,
                }
                return;
            }
            let cur_idx = cur as usize;
            let pos = if self.arena[cur_idx].as_ref().unwrap().lits[1] == other_lit {
                1
            } else {
                0
            };
            prev = Some((cur, pos));
            cur = self.arena[cur_idx].as_ref().unwrap().next[pos];
        }
        unreachable!("clause not found in its own second watch list");
    }

    #[cfg(feature = "logging")]
    fn format_pending(&self) -> String {
        use std::fmt::Write;
        let mut s = String::from("[");
        for (i, lit) in self.pending.iter().enumerate() {
            if i > 0 {
                s.push(' ');
            }
            write!(s, "{}", lit).unwrap();
        }
        s.push(']');
        s
    }

    /// `checker_remove`: delete a clause matching the pending literal set.
    pub fn delete(&mut self) {
        if self.inconsistent {
            self.pending.clear();
            return;
        }
        #[cfg(feature = "logging")]
        if self.logging {
            log::debug!("deleting clause {}", self.format_pending());
        }
        let trivial = self.normalize_pending();
        if !trivial {
            if self.pending.len() < 2 {
                checker_fatal!("clause requested to delete not found");
            }
            self.remove_matching_clause();
        }
        self.clear_pending();
    }

    /// Whether a clause is root-level satisfied: some literal in it is
    /// currently assigned true. Used by both GC and the leak check.
    fn clause_satisfied(&self, lits: &[Lit]) -> bool {
        lits.iter().any(|&l| self.value(l) > 0)
    }

    /// Opportunistic garbage collection of root-satisfied clauses (spec
    /// §4.3 "Garbage collection"). Runs the two-phase disconnect/reconnect:
    /// detach every clause's second watch so each survivor is reachable via
    /// exactly one list, free the satisfied ones in a single pass, then
    /// reattach second watches for the survivors.
    fn maybe_collect_garbage(&mut self) {
        if self.new_units == 0 {
            return;
        }
        if self.gc_wait > 0 {
            self.gc_wait -= 1;
            return;
        }
        self.collect_garbage();
        self.stats.collections += 1;
        self.gc_wait = self.stats.collections.saturating_mul(GC_INTERVAL);
        self.new_units = 0;
        #[cfg(feature = "logging")]
        if self.logging {
            log::debug!(
                "garbage collection {} collected {} clauses, {} remain",
                self.stats.collections,
                self.stats.collected,
                self.stats.clauses
            );
        }
    }

    fn collect_garbage(&mut self) {
        // Phase 1: detach every clause's second watch, so each survivor is
        // reachable via exactly one list (its first watch).
        self.disconnect_all_second_watches();

        // Phase 2: walk each first-watch-only list once, freeing clauses
        // that are root-level satisfied.
        for lit in 0..self.size {
            let mut prev: Option<u32> = None;
            let mut cur = self.watches[lit];
            while cur != INVALID {
                let idx = cur as usize;
                let next = self.arena[idx].as_ref().unwrap().next[0];
                let satisfied = self.clause_satisfied(&self.arena[idx].as_ref().unwrap().lits);
                if satisfied {
                    match prev {
                        Some(pc) => self.arena[pc as usize].as_mut().unwrap().next[0] = next,
                        None => self.watches[lit] = next,
                    }
                    self.free_clause(idx as u32);
                    self.stats.clauses -= 1;
                    self.stats.collected += 1;
                } else {
                    prev = Some(cur);
                }
                cur = next;
            }
        }

        // Phase 3: reattach second watches for survivors. A clause whose
        // first watched literal is `lit` gets prepended to the watch list
        // of its second literal; clauses reached via a literal that is
        // *not* their first watch are skipped here (they'll be visited,
        // and reattached, when `lit` reaches their actual first watch).
        for lit in 0..self.size {
            let mut cur = self.watches[lit];
            while cur != INVALID {
                let idx = cur as usize;
                let next = self.arena[idx].as_ref().unwrap().next[0];
                let clause = self.arena[idx].as_ref().unwrap();
                if clause.lits[0].index() == lit {
                    let second = clause.lits[1];
                    let head = self.watches[second.index()];
                    self.arena[idx].as_mut().unwrap().next[1] = head;
                    self.watches[second.index()] = idx as u32;
                }
                cur = next;
            }
        }
    }

    fn disconnect_all_second_watches(&mut self) {
        for lit in 0..self.size {
            let mut prev: Option<u32> = None;
            let mut cur = self.watches[lit];
            while cur != INVALID {
                let idx = cur as usize;
                let pos = if self.arena[idx].as_ref().unwrap().lits[1] as usize == lit {
                    1
                } else {
                    0
                };
                let next = self.arena[idx].as_ref().unwrap().next[pos];
                if pos == 1 {
                    match prev {
                        Some(pc) => self.arena[pc as usize].as_mut().unwrap().next[0] = next,
                        None => self.watches[lit] = next,
                    }
                    self.arena[idx].as_mut().unwrap().next[1] = INVALID;
                    cur = next;
                } else {
                    prev = Some(cur);
                    cur = next;
                }
            }
        }
    }

    /// `checker_release`: run the leak check (if enabled) then free every
    /// remaining clause by disconnecting second watches and walking the
    /// first-watch lists.
    pub fn release(&mut self) {
        #[cfg(feature = "logging")]
        if self.logging {
            log::debug!(
                "releasing checker: {} original, {} learned, {} deleted",
                self.stats.original,
                self.stats.learned,
                self.stats.deleted
            );
        }
        if self.leak_checking && !self.inconsistent {
            let mut remained = 0u64;
            for id in 0..self.arena.len() {
                if let Some(clause) = &self.arena[id] {
                    if !self.clause_satisfied(&clause.lits) {
                        remained += 1;
                    }
                }
            }
            self.stats.remained = remained;
            if remained > 0 {
                checker_fatal!(
                    "{} clause{} remain",
                    remained,
                    if remained == 1 { "" } else { "s" }
                );
            }
        }
        self.disconnect_all_second_watches();
        for lit in 0..self.size {
            let mut cur = self.watches[lit];
            while cur != INVALID {
                let idx = cur as usize;
                let next = self.arena[idx].as_ref().unwrap().next[0];
                self.arena[idx] = None;
                cur = next;
            }
        }
        self.marks.clear();
        self.values.clear();
        self.watches.clear();
        self.trail.release();
        self.pending.release();
    }
}

impl crate::dimacs::ClauseSink for Checker {
    fn add_literal(&mut self, lit: i32) {
        Checker::add_literal(self, lit);
    }

    fn add_original(&mut self) {
        Checker::add_original(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(c: &mut Checker, lits: &[i32]) {
        for &l in lits {
            c.add_literal(l);
        }
    }

    #[test]
    fn empty_formula_releases_cleanly() {
        let mut c = Checker::new();
        c.release();
    }

    #[test]
    fn unit_chain_of_learned_clauses() {
        let mut c = Checker::new();
        add(&mut c, &[1, 2]);
        c.add_original();
        add(&mut c, &[1, -2]);
        c.add_original();
        add(&mut c, &[-1, 2]);
        c.add_original();

        add(&mut c, &[1]);
        c.add_learned();
        add(&mut c, &[2]);
        c.add_learned();

        c.add_learned(); // empty clause: conflict derivable
        assert!(c.is_inconsistent());
        c.release();
    }

    #[test]
    #[should_panic]
    fn unimplied_learned_clause_aborts() {
        let mut c = Checker::new();
        add(&mut c, &[1, 2]);
        c.add_original();
        add(&mut c, &[3]);
        c.add_learned();
    }

    #[test]
    fn true_literal_makes_clause_trivial() {
        let mut c = Checker::new();
        add(&mut c, &[1]);
        c.add_original();
        add(&mut c, &[-1, 2]);
        c.add_original();
        assert_eq!(c.stats().clauses, 0);
        c.release();
    }

    #[test]
    fn delete_permuted_same_set_succeeds() {
        let mut c = Checker::new();
        add(&mut c, &[1, 2, 3]);
        c.add_original();
        add(&mut c, &[3, 1, 2]);
        c.delete();
        assert_eq!(c.stats().clauses, 0);
        c.release();
    }

    #[test]
    #[should_panic]
    fn delete_with_wrong_size_aborts() {
        let mut c = Checker::new();
        add(&mut c, &[1, 2, 3]);
        c.add_original();
        add(&mut c, &[1, 2]);
        c.delete();
    }

    #[test]
    #[should_panic]
    fn leak_check_flags_undeleted_clause() {
        let mut c = Checker::new();
        c.enable_leak_checking(true);
        add(&mut c, &[1, 2]);
        c.add_original();
        add(&mut c, &[1]);
        c.add_learned();
        c.release();
    }

    #[test]
    fn duplicate_add_then_single_delete_leaves_one_instance() {
        let mut c = Checker::new();
        add(&mut c, &[1, 2, 3]);
        c.add_original();
        add(&mut c, &[1, 2, 3]);
        c.add_original();
        assert_eq!(c.stats().clauses, 2);
        add(&mut c, &[1, 2, 3]);
        c.delete();
        assert_eq!(c.stats().clauses, 1);
        add(&mut c, &[1, 2, 3]);
        c.delete();
        c.release();
    }
}
