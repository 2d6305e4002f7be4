//! Function-object protocols for parameterizing catalog traversal.
//!
//! Each trait has a blanket implementation for matching closures and fn
//! items, so callers normally pass a closure:
//!
//! ```ignore
//! let families = repo.select(|g: &SmallGraph| g.is_family());
//! let by_size = repo.sorted_by(|g: &SmallGraph| g.names().len() as i32);
//! ```

/// A predicate over two values of the same type.
pub trait BinaryPredicate<T: ?Sized> {
    fn evaluate(&self, a: &T, b: &T) -> bool;
}

impl<T: ?Sized, F> BinaryPredicate<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    fn evaluate(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}

/// A function mapping a value to an `i32`, typically a sort key or a size.
pub trait IntFunction<T: ?Sized> {
    fn evaluate(&self, input: &T) -> i32;
}

impl<T: ?Sized, F> IntFunction<T> for F
where
    F: Fn(&T) -> i32,
{
    fn evaluate(&self, input: &T) -> i32 {
        self(input)
    }
}

/// A function from `I` to `O`.
pub trait UnaryFunction<I, O> {
    fn evaluate(&self, input: I) -> O;
}

impl<I, O, F> UnaryFunction<I, O> for F
where
    F: Fn(I) -> O,
{
    fn evaluate(&self, input: I) -> O {
        self(input)
    }
}
