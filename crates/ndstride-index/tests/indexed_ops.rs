use anyhow::Result;
use ndstride::{DType, Scalar, Shape, Tensor, TensorData};
use ndstride_index::{gather, scatter, scatter_add, scatter_fill};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

fn f32_tensor(dims: Vec<usize>, values: Vec<f32>) -> Tensor {
    Tensor::from_elems(Shape::new(dims), values)
}

fn index_tensor(dims: Vec<usize>, values: Vec<i64>) -> Tensor {
    Tensor::from_elems(Shape::new(dims), values)
}

#[test]
fn gather_matches_its_contract_in_2d() -> Result<()> {
    // src is the row-major 2x3 matrix [[1,2,3],[4,5,6]].
    let src = f32_tensor(vec![2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let index = index_tensor(vec![2, 2], vec![0, 2, 2, 1]);
    let mut dest = Tensor::zeros(DType::F32, Shape::new(vec![1]));

    gather(&mut dest, &src, 1, &index)?;

    assert_eq!(dest.dims(), index.dims());
    assert_eq!(dest.to_vec::<f32>(), vec![1.0, 3.0, 6.0, 5.0]);
    Ok(())
}

#[test]
fn gather_reads_along_axis_zero() -> Result<()> {
    let src = f32_tensor(vec![3, 2], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let index = index_tensor(vec![2, 2], vec![2, 0, 1, 1]);
    let mut dest = Tensor::zeros(DType::F32, Shape::new(vec![2, 2]));

    gather(&mut dest, &src, 0, &index)?;

    // dest[i][j] == src[index[i][j]][j]
    assert_eq!(dest.to_vec::<f32>(), vec![5.0, 2.0, 3.0, 4.0]);
    Ok(())
}

#[test]
fn gather_from_a_transposed_source() -> Result<()> {
    // A non-contiguous source: the 3x2 transpose of the buffer above.
    let src = Tensor::from_parts(
        Shape::new(vec![3, 2]),
        vec![1, 3],
        TensorData::F32(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
    );
    let index = index_tensor(vec![3, 1], vec![1, 0, 1]);
    let mut dest = Tensor::zeros(DType::F32, Shape::new(vec![1]));

    gather(&mut dest, &src, 1, &index)?;

    // Logical src is [[1,4],[2,5],[3,6]].
    assert_eq!(dest.to_vec::<f32>(), vec![4.0, 2.0, 6.0]);
    Ok(())
}

#[test]
fn gather_with_empty_index_yields_empty_result() -> Result<()> {
    let src = f32_tensor(vec![4], vec![1.0, 2.0, 3.0, 4.0]);
    let index = index_tensor(vec![0], vec![]);
    let mut dest = Tensor::zeros(DType::F32, Shape::new(vec![4]));

    gather(&mut dest, &src, 0, &index)?;

    assert_eq!(dest.dims(), &[0]);
    assert_eq!(dest.num_elements(), 0);
    Ok(())
}

#[test]
fn gather_supports_ranks_beyond_the_unrolled_paths() -> Result<()> {
    // Rank 4 takes the generic coordinate loop.
    let src = f32_tensor(vec![2, 2, 2, 2], (0..16).map(|v| v as f32).collect());
    let index = index_tensor(vec![2, 2, 2, 2], vec![1, 0, 1, 0, 0, 1, 0, 1, 1, 1, 0, 0, 0, 0, 1, 1]);
    let mut dest = Tensor::zeros(DType::F32, Shape::new(vec![1]));

    gather(&mut dest, &src, 3, &index)?;

    let src_values = src.to_vec::<f32>();
    let index_values = index.to_vec::<i64>();
    let expected: Vec<f32> = (0..16)
        .map(|linear| {
            let base = linear - linear % 2;
            src_values[base + index_values[linear] as usize]
        })
        .collect();
    assert_eq!(dest.to_vec::<f32>(), expected);
    Ok(())
}

#[test]
fn scatter_preserves_unaddressed_positions() -> Result<()> {
    let mut dest = Tensor::filled(Shape::new(vec![5]), -7.0f32);
    let index = index_tensor(vec![3], vec![0, 2, 4]);
    let src = f32_tensor(vec![3], vec![10.0, 20.0, 30.0]);

    scatter(&mut dest, 0, &index, &src)?;

    assert_eq!(dest.to_vec::<f32>(), vec![10.0, -7.0, 20.0, -7.0, 30.0]);
    Ok(())
}

#[test]
fn scatter_with_empty_index_is_a_no_op() -> Result<()> {
    let mut dest = Tensor::filled(Shape::new(vec![3, 3]), 4.0f32);
    let before = dest.clone();
    let index = index_tensor(vec![0], vec![]);
    let src = f32_tensor(vec![3, 3], vec![0.0; 9]);

    scatter(&mut dest, 0, &index, &src)?;

    assert_eq!(dest, before);
    Ok(())
}

#[test]
fn scatter_index_may_be_smaller_than_source_and_destination() -> Result<()> {
    let mut dest = Tensor::zeros(DType::I32, Shape::new(vec![3, 4]));
    let index = index_tensor(vec![2, 2], vec![3, 0, 1, 2]);
    let src = Tensor::from_elems(
        Shape::new(vec![3, 4]),
        (1..=12).collect::<Vec<i32>>(),
    );

    scatter(&mut dest, 1, &index, &src)?;

    // Only the top-left 2x2 block of src is consumed.
    assert_eq!(
        dest.to_vec::<i32>(),
        vec![2, 0, 0, 1, 0, 5, 6, 0, 0, 0, 0, 0]
    );
    Ok(())
}

#[test]
fn scatter_into_an_overlapped_destination_uses_the_guard() -> Result<()> {
    // Both logical rows share one physical buffer of three elements. The
    // kernel must run against a content-preserving contiguous snapshot;
    // writing straight through the zero stride would corrupt row 0's view
    // of untouched positions.
    let mut dest = Tensor::from_parts(
        Shape::new(vec![2, 3]),
        vec![0, 1],
        TensorData::F32(vec![1.0, 2.0, 3.0]),
    );
    let index = index_tensor(vec![2, 1], vec![0, 2]);
    let src = f32_tensor(vec![2, 3], vec![9.0; 6]);

    scatter(&mut dest, 1, &index, &src)?;

    // Snapshot rows were [1,2,3]/[1,2,3]; after the kernel they are
    // [9,2,3]/[1,2,9]. Copy-back writes logical rows in order into the
    // shared buffer, so the second row's values win.
    assert_eq!(dest.to_vec::<f32>(), vec![1.0, 2.0, 9.0, 1.0, 2.0, 9.0]);
    Ok(())
}

#[test]
fn scatter_fill_then_gather_recovers_the_fill_value() -> Result<()> {
    let mut dest = Tensor::zeros(DType::F32, Shape::new(vec![3, 5]));
    let index = index_tensor(vec![3, 2], vec![4, 1, 0, 3, 2, 2]);

    scatter_fill(&mut dest, 1, &index, Scalar::from(2.5f32))?;

    let mut recovered = Tensor::zeros(DType::F32, Shape::new(vec![1]));
    gather(&mut recovered, &dest, 1, &index)?;
    assert_eq!(recovered.to_vec::<f32>(), vec![2.5; 6]);
    Ok(())
}

#[test]
fn scatter_fill_converts_the_scalar_to_integer_destinations() -> Result<()> {
    let mut dest = Tensor::zeros(DType::I16, Shape::new(vec![4]));
    let index = index_tensor(vec![2], vec![1, 3]);

    scatter_fill(&mut dest, 0, &index, Scalar::from(7.9f64))?;

    assert_eq!(dest.to_vec::<i16>(), vec![0, 7, 0, 7]);
    Ok(())
}

#[test]
fn scatter_fill_on_booleans() -> Result<()> {
    let mut dest = Tensor::zeros(DType::Bool, Shape::new(vec![3]));
    let index = index_tensor(vec![2], vec![0, 2]);

    scatter_fill(&mut dest, 0, &index, Scalar::from(true))?;

    assert_eq!(dest.to_vec::<bool>(), vec![true, false, true]);
    Ok(())
}

#[test]
fn scatter_add_accumulates_one_hit_per_row() -> Result<()> {
    // The 3x3 scenario: index column [[0],[1],[2]] marks one target per row.
    let mut dest = Tensor::zeros(DType::F32, Shape::new(vec![3, 3]));
    let src = Tensor::filled(Shape::new(vec![3, 3]), 1.0f32);
    let index = index_tensor(vec![3, 1], vec![0, 1, 2]);

    scatter_add(&mut dest, 1, &index, &src)?;

    assert_eq!(
        dest.to_vec::<f32>(),
        vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]
    );
    Ok(())
}

#[test]
fn scatter_add_sums_duplicate_targets() -> Result<()> {
    let mut dest = Tensor::zeros(DType::I64, Shape::new(vec![4]));
    let index = index_tensor(vec![6], vec![2, 2, 0, 2, 0, 3]);
    let src = Tensor::from_elems(Shape::new(vec![6]), vec![1i64, 10, 100, 1000, 10000, 100000]);

    scatter_add(&mut dest, 0, &index, &src)?;

    assert_eq!(dest.to_vec::<i64>(), vec![10100, 0, 1011, 100000]);
    Ok(())
}

#[test]
fn scatter_add_is_invariant_to_duplicate_target_order() -> Result<()> {
    // Integer-valued floats keep the sums exact, so any processing order
    // must produce identical results.
    let mut rng = rand::rngs::StdRng::seed_from_u64(0x5eed);
    let entries: Vec<(i64, f32)> = (0..64)
        .map(|_| (rng.gen_range(0..8), rng.gen_range(-50..50) as f32))
        .collect();

    let mut reference: Option<Vec<f32>> = None;
    for _ in 0..5 {
        let mut shuffled = entries.clone();
        shuffled.shuffle(&mut rng);
        let index = index_tensor(vec![64], shuffled.iter().map(|&(i, _)| i).collect());
        let src = f32_tensor(vec![64], shuffled.iter().map(|&(_, v)| v).collect());

        let mut dest = Tensor::zeros(DType::F32, Shape::new(vec![8]));
        scatter_add(&mut dest, 0, &index, &src)?;
        let result = dest.to_vec::<f32>();
        match &reference {
            Some(expected) => assert_eq!(&result, expected),
            None => reference = Some(result),
        }
    }
    Ok(())
}

#[test]
fn operations_cover_every_numeric_dtype() -> Result<()> {
    // A 1-D scatter_add round on each accumulating dtype.
    macro_rules! roundtrip {
        ($ty:ty, $dtype:expr) => {{
            let mut dest = Tensor::zeros($dtype, Shape::new(vec![3]));
            let index = index_tensor(vec![2], vec![2, 2]);
            let src = Tensor::from_elems(Shape::new(vec![2]), vec![1 as $ty, 2 as $ty]);
            scatter_add(&mut dest, 0, &index, &src)?;
            assert_eq!(dest.to_vec::<$ty>(), vec![0 as $ty, 0 as $ty, 3 as $ty]);
        }};
    }

    roundtrip!(f32, DType::F32);
    roundtrip!(f64, DType::F64);
    roundtrip!(i8, DType::I8);
    roundtrip!(i16, DType::I16);
    roundtrip!(i32, DType::I32);
    roundtrip!(i64, DType::I64);
    roundtrip!(u8, DType::U8);
    Ok(())
}

#[test]
fn gather_on_booleans() -> Result<()> {
    let src = Tensor::from_elems(Shape::new(vec![4]), vec![true, false, true, false]);
    let index = index_tensor(vec![3], vec![2, 1, 0]);
    let mut dest = Tensor::zeros(DType::Bool, Shape::new(vec![1]));

    gather(&mut dest, &src, 0, &index)?;

    assert_eq!(dest.to_vec::<bool>(), vec![true, false, true]);
    Ok(())
}
