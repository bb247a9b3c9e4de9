fn main() {
    tonic_build::compile_protos("proto/blog.proto").unwrap();
}
