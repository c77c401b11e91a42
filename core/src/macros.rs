/// Matches based on a dimensionality type parameter.
///
/// # Examples
///
/// ```
/// # use cagrid_core::{match_rank, Dim};
/// fn f<D: Dim>() {
///     match_rank!(match D {
///         1 => (/* 1 dimension  */),
///         2 => (/* 2 dimensions */),
///         3 => (/* 3 dimensions */),
///
///         // No "default" case needed!
///     })
/// }
/// ```
#[macro_export]
macro_rules! match_rank {
    (match $dim:ty {
        1 => $case1:expr,
        2 => $case2:expr,
        3 => $case3:expr $(,)?
    }) => {
        match <$dim as $crate::dim::Dim>::NDIM {
            1 => $case1,
            2 => $case2,
            3 => $case3,
            _ => unreachable!("rank greater than 3"),
        }
    };
}
