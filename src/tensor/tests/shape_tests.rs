use crate::tensor::Tensor;

#[test]
fn test_stack() {
    let a = Tensor::new(&[1., 2., 3., 4.], &[1, 2, 2]);
    let b = Tensor::new(&[5., 6., 7., 8.], &[1, 2, 2]);
    let stacked = Tensor::stack(&[&a, &b]);
    assert_eq!(stacked.shape(), &[2, 1, 2, 2]);
    assert_eq!(stacked[[1, 0, 0, 0]], 5.);
    assert_eq!(stacked[[0, 0, 1, 1]], 4.);
}

#[test]
fn test_stack_scalars() {
    let a = Tensor::new(&[1.], &[]);
    let b = Tensor::new(&[2.], &[]);
    let stacked = Tensor::stack(&[&a, &b]);
    assert_eq!(stacked.shape(), &[2]);
    assert_eq!(stacked.to_vec(), vec![1., 2.]);
}

#[test]
#[should_panic]
fn test_stack_inconsistent_shape() {
    let a = Tensor::new(&[1., 2.], &[2]);
    let b = Tensor::new(&[1., 2., 3.], &[3]);
    let _ = Tensor::stack(&[&a, &b]);
}

#[test]
#[should_panic]
fn test_stack_empty() {
    let _ = Tensor::stack(&[]);
}
