mod hydration;
