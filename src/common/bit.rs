#[macro_export]
macro_rules! BIT {
    ( $x:expr ) => {
        1 << $x
    };
}

#[macro_export]
macro_rules! BIT_MASK_LEN {
    ( $x:expr ) => {
        $crate::BIT!($x) - 1
    };
}

// bits range: BIT_RNG!(3, 5)  0b111000,  from bit 3 to bit 5 inclusive
#[macro_export]
macro_rules! BIT_RNG {
    ( $s:expr, $e:expr ) => {
        $crate::BIT_MASK_LEN!($e - $s + 1) << $s
    };
}

/// Extracts the field selected by mask `$m` whose lowest bit sits at `$s`.
#[macro_export]
macro_rules! GET_FLD {
    ( $x:expr, $m:expr, $s:expr ) => {
        ($x & $m) >> $s
    };
}

/// Replaces the field selected by mask `$m` (lowest bit at `$s`) with `$v`.
/// Bits outside the mask are left as they were; `$v` is clipped to the mask.
#[macro_export]
macro_rules! SET_FLD_V {
    ( $x:expr, $m:expr, $s:expr, $v:expr ) => {
        $x = ($x & !$m) | (($v << $s) & $m)
    };
}
