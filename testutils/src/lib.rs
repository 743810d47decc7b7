//! Utilities used in tests in multiple crates within the workspace.

use std::{
    error::Error as StdError,
    fmt::{Debug, Display},
    marker::PhantomData,
    path::Path,
};

use anyhow::Result;
use googletest::{
    description::Description,
    matcher::{Matcher, MatcherBase, MatcherResult},
};

/// Matches an `anyhow::Error` when some error in its cause chain is an `E`
/// matching `inner`.
///
/// Stage errors are usually wrapped in context naming the file or page, so
/// the typed cause can sit anywhere in the chain.
pub fn has_cause<E, M>(inner: M) -> HasCause<E, M> {
    HasCause {
        inner,
        phantom_e: PhantomData,
    }
}

pub struct HasCause<E, M> {
    inner: M,
    phantom_e: PhantomData<E>,
}

impl<E, M> HasCause<E, M>
where
    E: StdError + 'static,
{
    fn causes(actual: &anyhow::Error) -> impl Iterator<Item = &E> {
        actual.chain().filter_map(|cause| cause.downcast_ref::<E>())
    }
}

impl<E, M> MatcherBase for HasCause<E, M> {}

impl<'a, E, M> Matcher<&'a anyhow::Error> for HasCause<E, M>
where
    E: Display + Debug + Send + Sync + StdError + 'static,
    M: Matcher<&'a E>,
{
    fn matches(&self, actual: &'a anyhow::Error) -> MatcherResult {
        Self::causes(actual)
            .any(|cause| self.inner.matches(cause).is_match())
            .into()
    }

    fn explain_match(&self, actual: &'a anyhow::Error) -> Description {
        let chain: Description = actual
            .chain()
            .map(|cause| Description::new().text(cause.to_string()))
            .fold(Description::new().text("whose cause chain is"), |desc, c| {
                desc.nested(c)
            });
        match Self::causes(actual).next() {
            Some(cause) => chain.nested(self.inner.explain_match(cause)),
            None => chain.text(format!(
                "and contains no {}",
                std::any::type_name::<E>()
            )),
        }
    }

    fn describe(&self, matcher_result: MatcherResult) -> Description {
        let type_name = std::any::type_name::<E>();
        match matcher_result {
            MatcherResult::Match => format!(
                "has a cause of type {} which {}",
                type_name,
                self.inner.describe(MatcherResult::Match)
            )
            .into(),
            MatcherResult::NoMatch => format!(
                "has no cause of type {} which {}",
                type_name,
                self.inner.describe(MatcherResult::Match)
            )
            .into(),
        }
    }
}

/// Returns the names of the files directly inside `dir`, sorted.
pub fn sorted_file_names(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in walkdir::WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if entry.file_type().is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}
