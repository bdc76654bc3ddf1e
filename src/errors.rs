error_chain! {
    foreign_links {
        Io(::std::io::Error);
    }

    errors {
        Decode(path: String) {
            description("could not decode image")
            display("could not decode image '{}'", path)
        }
        Encode(path: String) {
            description("could not encode image")
            display("could not encode image '{}'", path)
        }
        UnsupportedChannels(path: String, channels: usize) {
            description("image has too few channels")
            display("image '{}' has {} channel(s), the kernels need 3 (try --force-rgb)", path, channels)
        }
        Configuration(message: String) {
            description("invalid benchmark configuration")
            display("configuration error: {}", message)
        }
    }
}
