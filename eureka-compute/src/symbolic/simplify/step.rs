/// A rewrite applied by one of the simplification rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// `a + (b + c)` = `a + b + c`
    FlattenAdd,

    /// `2x + 3x` = `5x`, `2 + 3` = `5`
    CombineLikeTerms,

    /// `a * (b * c)` = `a * b * c`
    FlattenMul,

    /// `x * x^2` = `x^3`, `2 * 3` = `6`
    CombineLikeFactors,

    /// `0 * a` = `0`
    MultiplyZero,

    /// `a(b + c)` = `ab + ac`
    Distribute,

    /// `a^0` = `1`
    PowerZero,

    /// `a^1` = `a`
    PowerOne,

    /// `1^a` = `1`
    PowerOfOne,

    /// `0^a` = `0`, for positive `a`
    PowerOfZero,

    /// `2^3` = `8`, `4^(1/2)` = `2`
    EvaluatePower,

    /// `i^2` = `-1`
    ImaginaryPower,

    /// `(a^b)^n` = `a^(bn)`, for integer `n`
    PowerOfPower,

    /// `(ab)^n` = `a^n b^n`, for integer `n`
    PowerOfProduct,

    /// `(a + b)^2` = `(a + b)(a + b)`
    ExpandPower,

    /// `sin(-x)` = `-sin(x)`, `cos(-x)` = `cos(x)`
    FunctionParity,

    /// `sin(0)` = `0`, `exp(0)` = `1`, ...
    FunctionConstant,

    /// `exp(ln(x))` = `x`
    InverseFunction,

    /// `sin(0.5)` = `0.479...`
    EvaluateFunction,

    /// `diff(x, t, 0)` = `x`
    DerivativeOrderZero,

    /// `diff(diff(x, t), t)` = `diff(x, t, 2)`
    MergeDerivatives,

    /// `diff(2, t)` = `0`
    DerivativeOfConstant,

    /// `diff(t, t)` = `1`
    DerivativeOfVariable,

    /// `diff(a + b, t)` = `diff(a, t) + diff(b, t)`
    DerivativeOfSum,

    /// `diff(2x, t)` = `2 diff(x, t)`
    DerivativeCoefficient,
}
