//! The apply/skip/view/cancel decision of `update`

use crate::Result;

/// Answer to "Apply diff and update?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Apply the diff and advance the record
    Apply,
    /// Advance the record without touching files
    Skip,
    /// Show the diff, then ask again
    View,
    /// Leave everything as it is
    Cancel,
}

/// Asks the user what to do with a computed update.
pub trait Decider {
    /// Ask once.
    fn decide(&self) -> Result<Decision>;

    /// Present the diff after a [`Decision::View`]. Blank diffs are not
    /// passed here.
    fn view(&self, diff: &str) -> Result<()>;

    /// Tell the user a [`Decision::View`] found nothing to show.
    fn nothing_to_view(&self) -> Result<()> {
        Ok(())
    }
}

/// A [`Decider`] that always applies.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoApply;

impl Decider for AutoApply {
    fn decide(&self) -> Result<Decision> {
        Ok(Decision::Apply)
    }

    fn view(&self, _diff: &str) -> Result<()> {
        Ok(())
    }
}

/// Ask `decider` until it gives an answer other than [`Decision::View`].
pub fn resolve(decider: &dyn Decider, diff: &str) -> Result<Decision> {
    loop {
        match decider.decide()? {
            Decision::View => {
                if diff.trim().is_empty() {
                    decider.nothing_to_view()?;
                } else {
                    decider.view(diff)?;
                }
            }
            decision => return Ok(decision),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Scripted {
        answers: RefCell<Vec<Decision>>,
        viewed: RefCell<Vec<String>>,
        empty_views: RefCell<usize>,
    }

    impl Scripted {
        fn new(mut answers: Vec<Decision>) -> Self {
            answers.reverse();
            Self {
                answers: RefCell::new(answers),
                viewed: RefCell::new(Vec::new()),
                empty_views: RefCell::new(0),
            }
        }
    }

    impl Decider for Scripted {
        fn decide(&self) -> Result<Decision> {
            Ok(self.answers.borrow_mut().pop().unwrap_or(Decision::Cancel))
        }

        fn view(&self, diff: &str) -> Result<()> {
            self.viewed.borrow_mut().push(diff.to_string());
            Ok(())
        }

        fn nothing_to_view(&self) -> Result<()> {
            *self.empty_views.borrow_mut() += 1;
            Ok(())
        }
    }

    #[test]
    fn view_shows_diff_and_asks_again() {
        let decider = Scripted::new(vec![Decision::View, Decision::View, Decision::Skip]);
        assert_eq!(resolve(&decider, "diff --git a/x b/x\n").unwrap(), Decision::Skip);
        assert_eq!(decider.viewed.borrow().len(), 2);
    }

    #[test]
    fn viewing_blank_diff_reports_no_changes() {
        let decider = Scripted::new(vec![Decision::View, Decision::Apply]);
        assert_eq!(resolve(&decider, "  \n").unwrap(), Decision::Apply);
        assert!(decider.viewed.borrow().is_empty());
        assert_eq!(*decider.empty_views.borrow(), 1);
    }

    #[test]
    fn auto_apply_never_asks_twice() {
        assert_eq!(resolve(&AutoApply, "").unwrap(), Decision::Apply);
    }
}
