use anyhow::{Result, bail};
use std::{collections::HashSet, fmt::Debug, hash::Hash, ops::RangeBounds};

pub fn check_num<T, R>(num: T, range: R) -> Result<()>
where
    T: PartialOrd + Debug,
    R: RangeBounds<T> + Debug,
{
    if !range.contains(&num) {
        bail!("number must be in the range {range:?}, but is {num:?}");
    }

    Ok(())
}

pub fn check_list<T>(list: &[T]) -> Result<()>
where
    T: Eq + Hash + Debug,
{
    if list.is_empty() {
        bail!("list must not be empty");
    }

    let mut seen = HashSet::with_capacity(list.len());
    for ele in list {
        if !seen.insert(ele) {
            bail!("list must not contain duplicates, but {ele:?} is repeated");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_num_accepts_inclusive_bounds() {
        assert!(check_num(0.0, 0.0..=1.0).is_ok());
        assert!(check_num(1.0, 0.0..=1.0).is_ok());
        assert!(check_num(1.5, 0.0..=1.0).is_err());
        assert!(check_num(0, 1..10).is_err());
    }

    #[test]
    fn check_list_rejects_empty_and_duplicates() {
        assert!(check_list::<u64>(&[]).is_err());
        assert!(check_list(&[42, 43, 42]).is_err());
        assert!(check_list(&[42, 43, 44]).is_ok());
    }
}
